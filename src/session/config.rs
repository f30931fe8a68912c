use serde::{Deserialize, Serialize};

/// Configuration for an interview session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Unique session identifier
    pub session_id: String,

    /// Restart the recognition stream when it ends while the session still
    /// wants to listen (the platform governs stream lifetime, so spontaneous
    /// ends are normal)
    pub restart_on_end: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("session-{}", uuid::Uuid::new_v4()),
            restart_on_end: true,
        }
    }
}
