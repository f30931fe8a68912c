pub mod auth;
pub mod config;
pub mod http;
pub mod llm;
pub mod session;
pub mod speech;
pub mod store;

pub use auth::{AuthError, AuthServiceClient, Identity, IdentityProvider, StaticIdentityProvider};
pub use config::Config;
pub use http::{create_router, AppState, SessionEntry};
pub use llm::{GeminiClient, LanguageModel, LlmError, LlmRequest};
pub use session::{Feedback, SessionConfig, SessionController, SessionError, SessionSnapshot};
pub use speech::{
    ChannelBackend, ScriptedBackend, SpeechBackend, SpeechError, SpeechEvent, SpeechFeed,
};
pub use store::{FeedbackRecord, FeedbackStore, HttpFeedbackStore, MemoryFeedbackStore, StoreError};
