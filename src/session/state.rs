use serde::{Deserialize, Serialize};

/// Scored evaluation of one spoken answer
///
/// Produced by parsing the model's JSON reply, except for the fixed
/// no-answer sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    /// How relevant/correct the answer was (0-5)
    pub correctness: u8,

    /// How complete the answer was (0-5)
    pub completeness: u8,

    /// Free-text feedback from the model
    pub feedback: String,
}

impl Feedback {
    /// Fixed zero-score result for an empty or whitespace-only answer;
    /// the model is never consulted for this case
    pub fn no_answer() -> Self {
        Self {
            correctness: 0,
            completeness: 0,
            feedback: "No answer was provided. Please try again.".to_string(),
        }
    }
}

/// Point-in-time view of a session for the HTTP surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: String,

    /// Subject language of the current question
    pub subject: String,

    /// Current question, if one has been generated
    pub question: Option<String>,

    /// Latest recognized answer text
    pub transcript: String,

    /// Evaluation of the latest answer, if scored
    pub feedback: Option<Feedback>,

    /// Whether the session is capturing speech
    pub listening: bool,

    /// Whether a question request is in flight
    pub question_loading: bool,

    /// Whether a scoring request is in flight
    pub feedback_loading: bool,
}
