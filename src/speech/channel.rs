use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};
use tracing::info;

use super::backend::{SpeechBackend, SpeechError, SpeechEvent};

/// Channel capacity for recognition events; segments are small and arrive at
/// human speaking pace, so a short buffer is plenty
const EVENT_BUFFER: usize = 64;

type SharedSender = Arc<Mutex<Option<mpsc::Sender<SpeechEvent>>>>;

/// Recognition backend fed by an external client
///
/// The platform recognizer runs elsewhere (e.g. in the browser); recognized
/// segments and the end-of-stream marker are pushed in through the paired
/// `SpeechFeed` handle.
pub struct ChannelBackend {
    tx: SharedSender,
    capturing: Arc<AtomicBool>,
}

impl ChannelBackend {
    /// Create a backend and the feed handle that delivers events into it
    pub fn new() -> (Self, SpeechFeed) {
        let tx: SharedSender = Arc::new(Mutex::new(None));
        let backend = Self {
            tx: Arc::clone(&tx),
            capturing: Arc::new(AtomicBool::new(false)),
        };
        (backend, SpeechFeed { tx })
    }
}

#[async_trait]
impl SpeechBackend for ChannelBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<SpeechEvent>, SpeechError> {
        let mut slot = self.tx.lock().await;
        if slot.is_some() {
            return Err(SpeechError::AlreadyCapturing);
        }

        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        *slot = Some(tx);
        self.capturing.store(true, Ordering::SeqCst);

        info!("Recognition stream opened");
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<(), SpeechError> {
        let mut slot = self.tx.lock().await;
        if slot.take().is_none() {
            return Err(SpeechError::NotCapturing);
        }
        self.capturing.store(false, Ordering::SeqCst);

        info!("Recognition stream closed");
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "channel"
    }
}

/// Cloneable handle for pushing recognition events into a `ChannelBackend`
#[derive(Clone)]
pub struct SpeechFeed {
    tx: SharedSender,
}

impl SpeechFeed {
    /// Deliver the latest recognized segment
    pub async fn segment(&self, text: &str) -> Result<(), SpeechError> {
        self.send(SpeechEvent::Segment {
            text: text.to_string(),
        })
        .await
    }

    /// Signal that the recognition stream ended
    pub async fn end(&self) -> Result<(), SpeechError> {
        self.send(SpeechEvent::Ended).await
    }

    async fn send(&self, event: SpeechEvent) -> Result<(), SpeechError> {
        // Clone the sender out so the slot lock is not held across the send
        let sender = {
            let slot = self.tx.lock().await;
            slot.clone()
        };

        match sender {
            Some(tx) => tx
                .send(event)
                .await
                .map_err(|_| SpeechError::NotCapturing),
            None => Err(SpeechError::NotCapturing),
        }
    }
}
