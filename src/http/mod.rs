//! HTTP API server for the interview client
//!
//! This module provides a REST API driving interview sessions:
//! - POST /sessions - Create a session (binds the caller's identity)
//! - GET/DELETE /sessions/:id - Inspect or close a session
//! - POST /sessions/:id/question - Generate a question for a subject
//! - POST /sessions/:id/answer/start|stop - Control answer capture
//! - POST /sessions/:id/reattempt - Retry the current question
//! - POST /sessions/:id/transcript[/end] - Feed recognition events
//! - GET /history - The caller's past feedback, newest first
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::{AppState, SessionEntry};
