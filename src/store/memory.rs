use async_trait::async_trait;
use tokio::sync::Mutex;

use super::backend::{FeedbackStore, StoreError};
use super::record::FeedbackRecord;

/// In-memory feedback store for tests and local single-process runs
#[derive(Default)]
pub struct MemoryFeedbackStore {
    records: Mutex<Vec<FeedbackRecord>>,
}

impl MemoryFeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total record count across all users (for assertions)
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl FeedbackStore for MemoryFeedbackStore {
    async fn save(&self, record: &FeedbackRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock().await;
        records.push(record.clone());
        Ok(())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<FeedbackRecord>, StoreError> {
        let records = self.records.lock().await;

        let mut matching: Vec<FeedbackRecord> = records
            .iter()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect();

        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matching)
    }

    fn name(&self) -> &str {
        "memory"
    }
}
