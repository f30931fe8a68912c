use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::config::SessionConfig;
use super::state::{Feedback, SessionSnapshot};
use crate::auth::Identity;
use crate::llm::{prompts, response, LanguageModel, LlmError, LlmRequest};
use crate::speech::{SpeechBackend, SpeechError, SpeechEvent};
use crate::store::{FeedbackRecord, FeedbackStore};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("speech capture failed: {0}")]
    Speech(#[from] SpeechError),

    #[error("no question has been generated yet")]
    NoQuestion,

    #[error("a newer request superseded this one")]
    Superseded,
}

/// Mutable session state; lives behind one mutex so every transition is a
/// single consistent update
#[derive(Debug, Default)]
struct SessionState {
    subject: String,
    question: Option<String>,
    transcript: String,
    feedback: Option<Feedback>,
    listening: bool,
    question_loading: bool,
    feedback_loading: bool,
}

/// An interview session: question, transcript, feedback, and the speech
/// backend that feeds it
///
/// The controller owns its backend instance outright; closing the session
/// disposes it. Every operation that resets state advances a generation
/// counter, and an async completion only lands if its token is still
/// current, so a stale model reply can never overwrite newer state.
pub struct SessionController {
    /// Session configuration
    config: SessionConfig,

    /// Language model used for question generation and answer scoring
    llm: Arc<dyn LanguageModel>,

    /// Feedback persistence for signed-in users
    store: Arc<dyn FeedbackStore>,

    /// Identity bound at creation; persistence is skipped without one
    identity: Option<Identity>,

    /// Speech backend owned by this session
    speech: Arc<Mutex<Box<dyn SpeechBackend>>>,

    /// Current session state
    state: Arc<Mutex<SessionState>>,

    /// Generation counter for stale-completion suppression
    epoch: Arc<AtomicU64>,

    /// Handle for the recognition-event task
    listen_task: Mutex<Option<JoinHandle<()>>>,
}

impl SessionController {
    pub fn new(
        config: SessionConfig,
        llm: Arc<dyn LanguageModel>,
        store: Arc<dyn FeedbackStore>,
        speech: Box<dyn SpeechBackend>,
        identity: Option<Identity>,
    ) -> Self {
        info!("Creating interview session: {}", config.session_id);

        Self {
            config,
            llm,
            store,
            identity,
            speech: Arc::new(Mutex::new(speech)),
            state: Arc::new(Mutex::new(SessionState::default())),
            epoch: Arc::new(AtomicU64::new(0)),
            listen_task: Mutex::new(None),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.config.session_id
    }

    /// Request one new theoretical question about `subject`
    ///
    /// Clears any prior question, transcript, and feedback first. No retry:
    /// on failure the error is returned, the loading flag is cleared, and
    /// `question` stays empty until the caller re-invokes.
    pub async fn request_question(&self, subject: &str) -> Result<String, SessionError> {
        let token = self.begin_intent();
        {
            let mut state = self.state.lock().await;
            state.subject = subject.to_string();
            state.question = None;
            state.transcript.clear();
            state.feedback = None;
            state.question_loading = true;
            // This intent supersedes any in-flight scoring; its flag is ours now
            state.feedback_loading = false;
        }

        info!("Requesting question for subject: {}", subject);

        let result = async {
            let raw = self
                .llm
                .generate(LlmRequest::json(prompts::question_prompt(subject)))
                .await?;
            response::parse_question(&raw)
        }
        .await;

        let mut state = self.state.lock().await;
        if self.epoch.load(Ordering::SeqCst) != token {
            // A newer operation took over while this request was in flight;
            // its flags and state are not ours to touch
            warn!("Discarding stale question reply for subject: {}", subject);
            return Err(SessionError::Superseded);
        }
        state.question_loading = false;

        match result {
            Ok(question) => {
                state.question = Some(question.clone());
                info!("Question ready: {}", question);
                Ok(question)
            }
            Err(e) => {
                error!("Question generation failed: {}", e);
                Err(e.into())
            }
        }
    }

    /// Begin capturing a spoken answer
    ///
    /// Starting while already listening is tolerated as a no-op.
    pub async fn start_answering(&self) -> Result<(), SessionError> {
        {
            let mut state = self.state.lock().await;
            if state.listening {
                warn!("Session {} is already listening", self.config.session_id);
                return Ok(());
            }
            state.listening = true;
        }

        self.spawn_listener().await
    }

    /// Stop capturing and evaluate whatever was said
    ///
    /// An empty or whitespace-only transcript yields the fixed zero-score
    /// feedback without consulting the model or the store; otherwise the
    /// answer is scored and, for signed-in users, persisted.
    pub async fn stop_answering(&self) -> Result<Feedback, SessionError> {
        {
            let mut state = self.state.lock().await;
            state.listening = false;
        }

        {
            let mut speech = self.speech.lock().await;
            if let Err(e) = speech.stop().await {
                warn!("Failed to stop speech capture: {}", e);
            }
        }

        self.join_listener().await;

        evaluate_answer(
            &self.state,
            self.llm.as_ref(),
            self.store.as_ref(),
            self.identity.as_ref(),
            &self.epoch,
            &self.config.session_id,
        )
        .await
    }

    /// Discard the current answer and feedback and listen again; the
    /// question is preserved
    pub async fn reattempt(&self) -> Result<(), SessionError> {
        self.begin_intent();
        {
            let mut state = self.state.lock().await;
            state.feedback = None;
            state.transcript.clear();
            state.listening = true;
            state.question_loading = false;
            state.feedback_loading = false;
        }

        info!("Re-attempting question in session {}", self.config.session_id);

        let listener_alive = {
            let task = self.listen_task.lock().await;
            task.as_ref().map(|t| !t.is_finished()).unwrap_or(false)
        };
        if listener_alive {
            return Ok(());
        }

        self.spawn_listener().await
    }

    /// Get the current session state
    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().await;

        SessionSnapshot {
            session_id: self.config.session_id.clone(),
            subject: state.subject.clone(),
            question: state.question.clone(),
            transcript: state.transcript.clone(),
            feedback: state.feedback.clone(),
            listening: state.listening,
            question_loading: state.question_loading,
            feedback_loading: state.feedback_loading,
        }
    }

    /// Stop capture and dispose the speech backend and its task
    pub async fn close(&self) {
        info!("Closing interview session: {}", self.config.session_id);

        {
            let mut state = self.state.lock().await;
            state.listening = false;
        }

        {
            let mut speech = self.speech.lock().await;
            if speech.is_capturing() {
                if let Err(e) = speech.stop().await {
                    warn!("Failed to stop speech capture: {}", e);
                }
            }
        }

        self.join_listener().await;
    }

    fn begin_intent(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn join_listener(&self) {
        let task = {
            let mut handle = self.listen_task.lock().await;
            handle.take()
        };

        if let Some(task) = task {
            if let Err(e) = task.await {
                error!("Recognition task panicked: {}", e);
            }
        }
    }

    /// Start the speech backend and spawn the recognition-event task
    async fn spawn_listener(&self) -> Result<(), SessionError> {
        let rx = {
            let mut speech = self.speech.lock().await;
            match speech.start().await {
                Ok(rx) => rx,
                Err(SpeechError::AlreadyCapturing) => {
                    // The recognizer was already running; the existing task
                    // keeps consuming its stream
                    warn!("Speech capture already running");
                    return Ok(());
                }
                Err(e) => {
                    let mut state = self.state.lock().await;
                    state.listening = false;
                    return Err(e.into());
                }
            }
        };

        let state = Arc::clone(&self.state);
        let speech = Arc::clone(&self.speech);
        let llm = Arc::clone(&self.llm);
        let store = Arc::clone(&self.store);
        let epoch = Arc::clone(&self.epoch);
        let identity = self.identity.clone();
        let session_id = self.config.session_id.clone();
        let restart_on_end = self.config.restart_on_end;

        let task = tokio::spawn(async move {
            info!("Recognition task started for {}", session_id);

            let mut rx = rx;
            loop {
                while let Some(event) = rx.recv().await {
                    match event {
                        SpeechEvent::Segment { text } => {
                            // Latest segment replaces the transcript
                            let mut guard = state.lock().await;
                            guard.transcript = text;
                        }
                        SpeechEvent::Ended => break,
                    }
                }

                // Stream ended (explicit marker or channel close). If the
                // session still wants to listen, evaluate what accumulated
                // and restart the stream; otherwise stop_answering/close is
                // driving and this task just winds down.
                let (listening, has_question) = {
                    let guard = state.lock().await;
                    (guard.listening, guard.question.is_some())
                };
                if !listening {
                    break;
                }

                if has_question {
                    if let Err(e) = evaluate_answer(
                        &state,
                        llm.as_ref(),
                        store.as_ref(),
                        identity.as_ref(),
                        &epoch,
                        &session_id,
                    )
                    .await
                    {
                        warn!("End-of-stream scoring failed: {}", e);
                    }
                }

                if !restart_on_end {
                    let mut guard = state.lock().await;
                    guard.listening = false;
                    break;
                }

                let still_listening = state.lock().await.listening;
                if !still_listening {
                    break;
                }

                let mut backend = speech.lock().await;
                if let Err(e) = backend.stop().await {
                    warn!("Failed to reset speech capture: {}", e);
                }
                match backend.start().await {
                    Ok(new_rx) => {
                        info!("Recognition stream restarted for {}", session_id);
                        rx = new_rx;
                    }
                    Err(e) => {
                        warn!("Failed to restart speech capture: {}", e);
                        drop(backend);
                        let mut guard = state.lock().await;
                        guard.listening = false;
                        break;
                    }
                }
            }

            info!("Recognition task stopped for {}", session_id);
        });

        {
            let mut handle = self.listen_task.lock().await;
            *handle = Some(task);
        }

        Ok(())
    }
}

/// Evaluate the accumulated transcript: sentinel for silence, model scoring
/// otherwise, persistence when an identity is bound
///
/// Free-standing so both the controller methods and the recognition-event
/// task can call it with their own handles.
async fn evaluate_answer(
    state: &Mutex<SessionState>,
    llm: &dyn LanguageModel,
    store: &dyn FeedbackStore,
    identity: Option<&Identity>,
    epoch: &AtomicU64,
    session_id: &str,
) -> Result<Feedback, SessionError> {
    let token = epoch.fetch_add(1, Ordering::SeqCst) + 1;

    let (question, transcript) = {
        let mut guard = state.lock().await;
        // Scoring supersedes any in-flight question request
        guard.question_loading = false;

        if guard.transcript.trim().is_empty() {
            info!("Empty answer in session {}; returning sentinel", session_id);
            let sentinel = Feedback::no_answer();
            guard.feedback = Some(sentinel.clone());
            return Ok(sentinel);
        }

        let question = guard.question.clone().ok_or(SessionError::NoQuestion)?;
        guard.feedback_loading = true;
        (question, guard.transcript.clone())
    };

    info!(
        "Scoring answer in session {} ({} transcript chars)",
        session_id,
        transcript.len()
    );

    let result = async {
        let raw = llm
            .generate(LlmRequest::text(prompts::scoring_prompt(
                &question,
                &transcript,
            )))
            .await?;
        response::parse_feedback(&raw)
    }
    .await;

    let feedback = {
        let mut guard = state.lock().await;
        if epoch.load(Ordering::SeqCst) != token {
            warn!("Discarding stale scoring reply in session {}", session_id);
            return Err(SessionError::Superseded);
        }
        guard.feedback_loading = false;

        match result {
            Ok(feedback) => {
                guard.feedback = Some(feedback.clone());
                feedback
            }
            Err(e) => {
                error!("Answer scoring failed: {}", e);
                return Err(e.into());
            }
        }
    };

    match identity {
        Some(identity) => {
            let record =
                FeedbackRecord::new(&question, &transcript, feedback.clone(), &identity.user_id);
            if let Err(e) = store.save(&record).await {
                // The session result stands; history just misses this record
                warn!("Failed to persist feedback record: {}", e);
            }
        }
        None => {
            info!("No identity bound to session {}; feedback not persisted", session_id);
        }
    }

    Ok(feedback)
}
