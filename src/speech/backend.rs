use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// One event from a continuous recognition stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// Latest recognized segment (top alternative only); REPLACES any
    /// previously recognized text rather than appending to it
    Segment { text: String },
    /// The recognition stream ended
    Ended,
}

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech capture already started")]
    AlreadyCapturing,

    #[error("no recognition stream is active")]
    NotCapturing,

    #[error("speech backend unavailable: {0}")]
    Unavailable(String),
}

/// Speech recognition backend trait
///
/// The stream has no timeout of its own; whoever feeds it governs its
/// lifetime, and a spontaneous end while the session still wants to listen
/// is handled by the controller (score what accumulated, then restart).
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Start a recognition stream
    ///
    /// Returns a channel receiver that will receive recognition events.
    /// Starting while already capturing returns `AlreadyCapturing`, which
    /// callers tolerate.
    async fn start(&mut self) -> Result<mpsc::Receiver<SpeechEvent>, SpeechError>;

    /// Stop the recognition stream
    async fn stop(&mut self) -> Result<(), SpeechError>;

    /// Check if a stream is currently active
    fn is_capturing(&self) -> bool;

    /// Get backend name for logging
    fn name(&self) -> &str;
}
