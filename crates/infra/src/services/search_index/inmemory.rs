use super::{EventDocument, ISearchIndex, SearchIndexError};
use eventhub_domain::ID;
use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

/// Search index keeping the documents in memory, used when no search index is
/// configured and in tests.
#[derive(Default)]
pub struct InMemorySearchIndex {
    documents: Mutex<HashMap<ID, EventDocument>>,
    upserts: AtomicUsize,
}

impl InMemorySearchIndex {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn get(&self, id: &ID) -> Option<EventDocument> {
        self.documents
            .lock()
            .ok()
            .and_then(|docs| docs.get(id).cloned())
    }

    pub fn len(&self) -> usize {
        self.documents.lock().map(|docs| docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of upserts received, including overwrites
    pub fn upsert_count(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ISearchIndex for InMemorySearchIndex {
    async fn upsert(&self, doc: &EventDocument) -> Result<(), SearchIndexError> {
        let mut docs = self.documents.lock().map_err(|_| SearchIndexError::UnexpectedStatus {
            status: 500,
            body: "Inmemory search index lock was poisoned".into(),
        })?;
        docs.insert(doc.id, doc.clone());
        self.upserts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
