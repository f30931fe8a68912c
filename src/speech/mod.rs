//! Speech capture adapter
//!
//! Wraps a continuous, interim-results-enabled recognition stream behind the
//! `SpeechBackend` trait. The session controller owns one backend instance
//! per session and consumes its event channel; nothing here is process-global.
//!
//! Implementations:
//! - `ChannelBackend` - events pushed by the client that runs platform
//!   recognition (production)
//! - `ScriptedBackend` - plays pre-scripted event streams (tests, demos)

pub mod backend;
pub mod channel;
pub mod scripted;

pub use backend::{SpeechBackend, SpeechError, SpeechEvent};
pub use channel::{ChannelBackend, SpeechFeed};
pub use scripted::ScriptedBackend;
