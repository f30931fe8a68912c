use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::Feedback;

/// One persisted interview answer with its evaluation
///
/// Created once per scored answer and never modified; `created_at` is
/// client-generated and serializes as an RFC 3339 timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: Uuid,
    pub question: String,
    pub transcript: String,
    pub feedback: Feedback,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl FeedbackRecord {
    pub fn new(question: &str, transcript: &str, feedback: Feedback, user_id: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            question: question.to_string(),
            transcript: transcript.to_string(),
            feedback,
            user_id: user_id.to_string(),
            created_at: Utc::now(),
        }
    }
}
