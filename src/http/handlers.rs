use super::state::{AppState, SessionEntry};
use crate::auth::Identity;
use crate::session::{Feedback, SessionConfig, SessionController, SessionError, SessionSnapshot};
use crate::speech::{ChannelBackend, SpeechError};
use crate::store::FeedbackRecord;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    /// Optional session ID (if not provided, generate one)
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub signed_in: bool,
}

#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    /// Subject language to generate a question for
    pub subject: String,
}

#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub session_id: String,
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub session_id: String,
    pub feedback: Feedback,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub session_id: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptSegmentRequest {
    /// Latest recognized segment (replaces earlier text)
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Helpers
// ============================================================================

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Resolve the caller's identity; provider failures degrade to anonymous
async fn resolve_identity(state: &AppState, headers: &HeaderMap) -> Option<Identity> {
    let token = bearer_token(headers)?;

    match state.identity.resolve(token).await {
        Ok(identity) => identity,
        Err(e) => {
            warn!("Identity resolution failed: {}", e);
            None
        }
    }
}

fn session_error_response(e: SessionError) -> axum::response::Response {
    let status = match &e {
        SessionError::Llm(_) => StatusCode::BAD_GATEWAY,
        SessionError::NoQuestion | SessionError::Superseded => StatusCode::CONFLICT,
        SessionError::Speech(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

fn not_found(session_id: &str) -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Session {} not found", session_id),
        }),
    )
        .into_response()
}

async fn entry(state: &AppState, session_id: &str) -> Option<SessionEntry> {
    let sessions = state.sessions.read().await;
    sessions.get(session_id).cloned()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /sessions
/// Create a new interview session bound to the caller's identity
pub async fn create_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateSessionRequest>,
) -> impl IntoResponse {
    let session_id = req
        .session_id
        .unwrap_or_else(|| format!("session-{}", uuid::Uuid::new_v4()));

    info!("Creating session: {}", session_id);

    {
        let sessions = state.sessions.read().await;
        if sessions.contains_key(&session_id) {
            return (
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: format!("Session {} already exists", session_id),
                }),
            )
                .into_response();
        }
    }

    let identity = resolve_identity(&state, &headers).await;
    let signed_in = identity.is_some();

    let (backend, feed) = ChannelBackend::new();
    let config = SessionConfig {
        session_id: session_id.clone(),
        restart_on_end: true,
    };

    let controller = Arc::new(SessionController::new(
        config,
        Arc::clone(&state.llm),
        Arc::clone(&state.store),
        Box::new(backend),
        identity,
    ));

    {
        let mut sessions = state.sessions.write().await;
        sessions.insert(session_id.clone(), SessionEntry { controller, feed });
    }

    info!("Session created: {} (signed_in={})", session_id, signed_in);

    (
        StatusCode::OK,
        Json(CreateSessionResponse {
            session_id,
            signed_in,
        }),
    )
        .into_response()
}

/// GET /sessions/:session_id
/// Get the current state of a session
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match entry(&state, &session_id).await {
        Some(entry) => {
            let snapshot: SessionSnapshot = entry.controller.snapshot().await;
            (StatusCode::OK, Json(snapshot)).into_response()
        }
        None => not_found(&session_id),
    }
}

/// DELETE /sessions/:session_id
/// Close a session and dispose its speech backend
pub async fn close_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let removed = {
        let mut sessions = state.sessions.write().await;
        sessions.remove(&session_id)
    };

    match removed {
        Some(entry) => {
            entry.controller.close().await;
            info!("Session closed: {}", session_id);
            (
                StatusCode::OK,
                Json(StatusResponse {
                    session_id,
                    status: "closed".to_string(),
                }),
            )
                .into_response()
        }
        None => not_found(&session_id),
    }
}

/// POST /sessions/:session_id/question
/// Generate a new question for the given subject
pub async fn request_question(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<QuestionRequest>,
) -> impl IntoResponse {
    let Some(entry) = entry(&state, &session_id).await else {
        return not_found(&session_id);
    };

    match entry.controller.request_question(&req.subject).await {
        Ok(question) => (
            StatusCode::OK,
            Json(QuestionResponse {
                session_id,
                question,
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Question request failed for {}: {}", session_id, e);
            session_error_response(e)
        }
    }
}

/// POST /sessions/:session_id/answer/start
/// Begin capturing a spoken answer
pub async fn start_answer(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let Some(entry) = entry(&state, &session_id).await else {
        return not_found(&session_id);
    };

    match entry.controller.start_answering().await {
        Ok(()) => (
            StatusCode::OK,
            Json(StatusResponse {
                session_id,
                status: "listening".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to start answering in {}: {}", session_id, e);
            session_error_response(e)
        }
    }
}

/// POST /sessions/:session_id/answer/stop
/// Stop capturing and evaluate the answer
pub async fn stop_answer(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let Some(entry) = entry(&state, &session_id).await else {
        return not_found(&session_id);
    };

    match entry.controller.stop_answering().await {
        Ok(feedback) => (
            StatusCode::OK,
            Json(AnswerResponse {
                session_id,
                feedback,
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to evaluate answer in {}: {}", session_id, e);
            session_error_response(e)
        }
    }
}

/// POST /sessions/:session_id/reattempt
/// Discard the current answer and listen again
pub async fn reattempt(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let Some(entry) = entry(&state, &session_id).await else {
        return not_found(&session_id);
    };

    match entry.controller.reattempt().await {
        Ok(()) => (
            StatusCode::OK,
            Json(StatusResponse {
                session_id,
                status: "listening".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to re-attempt in {}: {}", session_id, e);
            session_error_response(e)
        }
    }
}

/// POST /sessions/:session_id/transcript
/// Deliver the latest recognized segment from the platform recognizer
pub async fn push_transcript(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<TranscriptSegmentRequest>,
) -> impl IntoResponse {
    let Some(entry) = entry(&state, &session_id).await else {
        return not_found(&session_id);
    };

    match entry.feed.segment(&req.text).await {
        Ok(()) => (
            StatusCode::OK,
            Json(StatusResponse {
                session_id,
                status: "accepted".to_string(),
            }),
        )
            .into_response(),
        Err(SpeechError::NotCapturing) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "No recognition stream is active".to_string(),
            }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

/// POST /sessions/:session_id/transcript/end
/// Signal that the recognition stream ended
pub async fn end_transcript(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let Some(entry) = entry(&state, &session_id).await else {
        return not_found(&session_id);
    };

    match entry.feed.end().await {
        Ok(()) => (
            StatusCode::OK,
            Json(StatusResponse {
                session_id,
                status: "ended".to_string(),
            }),
        )
            .into_response(),
        Err(SpeechError::NotCapturing) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "No recognition stream is active".to_string(),
            }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

/// GET /history
/// Past feedback records for the signed-in caller, newest first
///
/// An anonymous caller gets an empty list, and store failures degrade to an
/// empty list as well; history is never an error surface.
pub async fn history(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let Some(identity) = resolve_identity(&state, &headers).await else {
        return (StatusCode::OK, Json(Vec::<FeedbackRecord>::new())).into_response();
    };

    match state.store.list_for_user(&identity.user_id).await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => {
            warn!("History fetch failed for {}: {}", identity.user_id, e);
            (StatusCode::OK, Json(Vec::<FeedbackRecord>::new())).into_response()
        }
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
