use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

use super::backend::{SpeechBackend, SpeechError, SpeechEvent};

/// Recognition backend that plays pre-scripted event streams
///
/// Each call to `start` plays the next script. The stream stays open after
/// the script runs out of events (like a recognizer waiting for more speech)
/// unless the script itself carries an `Ended` marker; once all scripts are
/// consumed, further starts fail.
pub struct ScriptedBackend {
    scripts: Arc<Mutex<VecDeque<Vec<SpeechEvent>>>>,
    tx: Arc<Mutex<Option<mpsc::Sender<SpeechEvent>>>>,
    capturing: Arc<AtomicBool>,
    starts: Arc<AtomicUsize>,
}

impl ScriptedBackend {
    pub fn new(scripts: Vec<Vec<SpeechEvent>>) -> Self {
        Self {
            scripts: Arc::new(Mutex::new(scripts.into())),
            tx: Arc::new(Mutex::new(None)),
            capturing: Arc::new(AtomicBool::new(false)),
            starts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of times a stream was started (for assertions)
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    /// Counter handle that stays valid after the backend is boxed away
    pub fn starts_handle(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.starts)
    }
}

#[async_trait]
impl SpeechBackend for ScriptedBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<SpeechEvent>, SpeechError> {
        let mut slot = self.tx.lock().await;
        if slot.is_some() {
            return Err(SpeechError::AlreadyCapturing);
        }

        let script = {
            let mut scripts = self.scripts.lock().await;
            scripts
                .pop_front()
                .ok_or_else(|| SpeechError::Unavailable("script exhausted".to_string()))?
        };

        let (tx, rx) = mpsc::channel(64);
        *slot = Some(tx.clone());
        self.capturing.store(true, Ordering::SeqCst);
        self.starts.fetch_add(1, Ordering::SeqCst);

        tokio::spawn(async move {
            for event in script {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
            // The slot keeps its own sender, so the channel stays open here
        });

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<(), SpeechError> {
        let mut slot = self.tx.lock().await;
        if slot.take().is_none() {
            return Err(SpeechError::NotCapturing);
        }
        self.capturing.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
