use crate::auth::IdentityProvider;
use crate::llm::LanguageModel;
use crate::session::SessionController;
use crate::speech::SpeechFeed;
use crate::store::FeedbackStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// One live session plus the feed that delivers recognition events into it
#[derive(Clone)]
pub struct SessionEntry {
    pub controller: Arc<SessionController>,
    pub feed: SpeechFeed,
}

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Live interview sessions (session_id → entry)
    pub sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,

    /// Language model shared by all sessions
    pub llm: Arc<dyn LanguageModel>,

    /// Feedback persistence shared by all sessions
    pub store: Arc<dyn FeedbackStore>,

    /// Identity provider for bearer-token resolution
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(
        llm: Arc<dyn LanguageModel>,
        store: Arc<dyn FeedbackStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            llm,
            store,
            identity,
        }
    }
}
