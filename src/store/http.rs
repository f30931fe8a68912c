use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use super::backend::{FeedbackStore, StoreError};
use super::record::FeedbackRecord;

/// Thin client for the remote document-store API
///
/// One logical collection of feedback records; inserts are plain POSTs and
/// queries use the API's equality filter and ordering parameters. Per-call
/// atomicity is the store's own; there are no transactions here.
pub struct HttpFeedbackStore {
    client: Client,
    base_url: String,
    collection: String,
}

impl HttpFeedbackStore {
    pub fn new(base_url: &str, collection: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            collection: collection.to_string(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.base_url, self.collection)
    }
}

#[async_trait]
impl FeedbackStore for HttpFeedbackStore {
    async fn save(&self, record: &FeedbackRecord) -> Result<(), StoreError> {
        let response = self
            .client
            .post(self.collection_url())
            .json(record)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        info!("Saved feedback record {} for {}", record.id, record.user_id);
        Ok(())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<FeedbackRecord>, StoreError> {
        let filter = format!("eq.{user_id}");
        let response = self
            .client
            .get(self.collection_url())
            .query(&[("user_id", filter.as_str()), ("order", "created_at.desc")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let records: Vec<FeedbackRecord> = response.json().await?;
        Ok(records)
    }

    fn name(&self) -> &str {
        "http"
    }
}
