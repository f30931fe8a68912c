//! Interview session management
//!
//! This module provides the `SessionController` abstraction that manages:
//! - Question generation through the language model
//! - Speech capture and transcript accumulation
//! - Answer scoring and feedback parsing
//! - Feedback persistence for signed-in users
//! - Session state snapshots for the HTTP surface

mod config;
mod controller;
mod state;

pub use config::SessionConfig;
pub use controller::{SessionController, SessionError};
pub use state::{Feedback, SessionSnapshot};
