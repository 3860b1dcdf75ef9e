use super::{EventDocument, ISearchIndex};
use eventhub_domain::{Event, ID};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

/// Mirrors `Event`s into the search index in the background.
///
/// Events are queued on bounded channels drained by a fixed number of
/// workers, so a burst of writes never turns into an unbounded number of
/// concurrent index calls. Every event id is always handled by the same
/// worker, so the mirror ends up with the last queued version of an event.
/// Mirroring is best-effort: failures are logged and dropped, a full reindex
/// repairs the index.
#[derive(Clone)]
pub struct SearchIndexSync {
    senders: Vec<mpsc::Sender<Event>>,
}

impl SearchIndexSync {
    /// Spawns the workers. Must be called from within a tokio runtime.
    ///
    /// `queue_capacity` is shared evenly between the workers.
    pub fn start(index: Arc<dyn ISearchIndex>, workers: usize, queue_capacity: usize) -> Self {
        let workers = workers.max(1);
        let capacity_per_worker = ((queue_capacity + workers - 1) / workers).max(1);

        let senders = (0..workers)
            .map(|worker| {
                let (sender, mut receiver) = mpsc::channel::<Event>(capacity_per_worker);
                let index = index.clone();
                tokio::spawn(async move {
                    while let Some(event) = receiver.recv().await {
                        upsert_event(index.as_ref(), &event).await;
                    }
                    debug!("Search index worker {} stopped", worker);
                });
                sender
            })
            .collect();

        Self { senders }
    }

    fn sender_for(&self, event_id: &ID) -> &mpsc::Sender<Event> {
        let worker = event_id.inner().rem_euclid(self.senders.len() as i64) as usize;
        &self.senders[worker]
    }

    /// Queues the event without waiting. Dropped with a warning if the queue is full.
    pub fn sync(&self, event: Event) {
        match self.sender_for(&event.id).try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(
                    "Search index queue is full, event {} will not be mirrored until the next reindex",
                    event.id
                );
            }
            Err(TrySendError::Closed(event)) => {
                warn!(
                    "Search index workers are gone, event {} will not be mirrored",
                    event.id
                );
            }
        }
    }

    /// Queues every event, waiting for room in the queue but not for the
    /// index calls. Returns the number of queued events.
    pub async fn sync_all(&self, events: Vec<Event>) -> usize {
        let mut queued = 0;
        for event in events {
            if self.sender_for(&event.id).send(event).await.is_err() {
                warn!("Search index workers are gone, stopping reindex");
                break;
            }
            queued += 1;
        }
        queued
    }
}

async fn upsert_event(index: &dyn ISearchIndex, event: &Event) {
    let doc = EventDocument::from(event);
    if let Err(e) = index.upsert(&doc).await {
        warn!("Unable to mirror event {} into the search index: {}", event.id, e);
    }
}
