use super::{EventDocument, ISearchIndex, SearchIndexError};
use reqwest::Client;
use tracing::debug;

/// Elasticsearch backed search index
pub struct ElasticSearchIndex {
    client: Client,
    base_url: String,
    index: String,
}

impl ElasticSearchIndex {
    pub fn new(base_url: String, index: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            index,
        }
    }

    fn document_url(&self, doc: &EventDocument) -> String {
        format!("{}/{}/_doc/{}", self.base_url, self.index, doc.id)
    }
}

#[async_trait::async_trait]
impl ISearchIndex for ElasticSearchIndex {
    async fn upsert(&self, doc: &EventDocument) -> Result<(), SearchIndexError> {
        let url = self.document_url(doc);
        let res = self.client.put(&url).json(doc).send().await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(SearchIndexError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }
        debug!("Indexed event document: {}", url);
        Ok(())
    }
}
