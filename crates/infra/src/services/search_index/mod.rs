mod elastic;
mod inmemory;
mod sync;

use eventhub_domain::{Event, ID};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use elastic::ElasticSearchIndex;
pub use inmemory::InMemorySearchIndex;
pub use sync::SearchIndexSync;

/// The denormalized `Event` stored in the search index, keyed by the event id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDocument {
    pub id: ID,
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: String,
    pub location: String,
    pub is_public: bool,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub start_time: String,
    /// `HH:MM`
    pub end_time: String,
    pub organization_id: ID,
    pub creator_id: ID,
}

impl From<&Event> for EventDocument {
    fn from(e: &Event) -> Self {
        Self {
            id: e.id,
            title: e.title.clone(),
            description: e.description.clone(),
            category: e.category.clone(),
            status: e.status.to_string(),
            location: e.location.clone(),
            is_public: e.is_public,
            date: e.date.format("%Y-%m-%d").to_string(),
            start_time: e.start_time.format("%H:%M").to_string(),
            end_time: e.end_time.format("%H:%M").to_string(),
            organization_id: e.organization_id,
            creator_id: e.creator_id,
        }
    }
}

#[derive(Error, Debug)]
pub enum SearchIndexError {
    #[error("Unable to reach the search index: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Search index responded with status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("Unable to serialize document: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// External full text index mirroring the events
#[async_trait::async_trait]
pub trait ISearchIndex: Send + Sync {
    /// Creates or overwrites the document with the same id
    async fn upsert(&self, doc: &EventDocument) -> Result<(), SearchIndexError>;
}
