use eventhub_domain::{Entity, ID};
use std::sync::{Mutex, MutexGuard};

/// Useful functions for creating inmemory repositories

pub fn lock<T>(collection: &Mutex<T>) -> anyhow::Result<MutexGuard<'_, T>> {
    collection
        .lock()
        .map_err(|_| anyhow::anyhow!("Inmemory collection lock was poisoned"))
}

pub fn insert<T: Clone>(val: &T, collection: &Mutex<Vec<T>>) -> anyhow::Result<()> {
    let mut collection = lock(collection)?;
    collection.push(val.clone());
    Ok(())
}

pub fn find<T: Clone + Entity>(
    val_id: &ID,
    collection: &Mutex<Vec<T>>,
) -> anyhow::Result<Option<T>> {
    let collection = lock(collection)?;
    Ok(collection.iter().find(|item| item.id() == val_id).cloned())
}

pub fn find_by<T: Clone, F: FnMut(&T) -> bool>(
    collection: &Mutex<Vec<T>>,
    mut compare: F,
) -> anyhow::Result<Vec<T>> {
    let collection = lock(collection)?;
    let mut items = Vec::new();
    for item in collection.iter() {
        if compare(item) {
            items.push(item.clone());
        }
    }
    Ok(items)
}

/// Applies `update` to every item matching `compare` and returns the ids of the updated items
pub fn update_many<T: Entity, F: Fn(&T) -> bool, U: Fn(&mut T)>(
    collection: &Mutex<Vec<T>>,
    compare: F,
    update: U,
) -> anyhow::Result<Vec<ID>> {
    let mut collection = lock(collection)?;
    let mut updated = Vec::new();
    for item in collection.iter_mut() {
        if compare(item) {
            update(item);
            updated.push(*item.id());
        }
    }
    Ok(updated)
}
