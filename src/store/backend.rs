use async_trait::async_trait;
use thiserror::Error;

use super::record::FeedbackRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store API returned {status}: {message}")]
    Api { status: u16, message: String },
}

/// Feedback persistence trait
///
/// Write failures are logged by callers and never surfaced to the session;
/// read failures degrade to an empty history. Records are immutable once
/// saved.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Insert one record
    async fn save(&self, record: &FeedbackRecord) -> Result<(), StoreError>;

    /// All records for `user_id`, ordered by `created_at` descending;
    /// an unknown user yields an empty list, not an error
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<FeedbackRecord>, StoreError>;

    /// Store name for logging
    fn name(&self) -> &str;
}
