//! Strict parsing of model replies
//!
//! The hosted model is untrusted: replies are sometimes wrapped in markdown
//! code fences, and field values can drift from the requested shape. Fences
//! are stripped first, then the JSON is parsed and validated against the
//! expected shape; any mismatch is a typed error, never a partial result.

use serde::Deserialize;

use super::client::LlmError;
use crate::session::Feedback;

/// Remove ```json / ``` fences the model sometimes wraps replies in
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

#[derive(Debug, Deserialize)]
struct QuestionReply {
    question: String,
}

/// Parse a question-generation reply: `{"question": "..."}`
pub fn parse_question(raw: &str) -> Result<String, LlmError> {
    let cleaned = strip_code_fences(raw);
    let reply: QuestionReply = serde_json::from_str(&cleaned)?;

    let question = reply.question.trim();
    if question.is_empty() {
        return Err(LlmError::Schema("question field is empty".to_string()));
    }

    Ok(question.to_string())
}

#[derive(Debug, Deserialize)]
struct FeedbackReply {
    correctness: i64,
    completeness: i64,
    feedback: String,
}

/// Parse a scoring reply: integer scores 0-5 plus a feedback string
pub fn parse_feedback(raw: &str) -> Result<Feedback, LlmError> {
    let cleaned = strip_code_fences(raw);
    let reply: FeedbackReply = serde_json::from_str(&cleaned)?;

    Ok(Feedback {
        correctness: score_in_range("correctness", reply.correctness)?,
        completeness: score_in_range("completeness", reply.completeness)?,
        feedback: reply.feedback,
    })
}

fn score_in_range(field: &str, value: i64) -> Result<u8, LlmError> {
    if (0..=5).contains(&value) {
        Ok(value as u8)
    } else {
        Err(LlmError::Schema(format!(
            "{field} score {value} is outside 0-5"
        )))
    }
}
