mod search_index;

pub use search_index::{
    ElasticSearchIndex, EventDocument, ISearchIndex, InMemorySearchIndex, SearchIndexError,
    SearchIndexSync,
};
