use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session lifecycle
        .route("/sessions", post(handlers::create_session))
        .route(
            "/sessions/:session_id",
            get(handlers::get_session).delete(handlers::close_session),
        )
        // Session operations
        .route(
            "/sessions/:session_id/question",
            post(handlers::request_question),
        )
        .route(
            "/sessions/:session_id/answer/start",
            post(handlers::start_answer),
        )
        .route(
            "/sessions/:session_id/answer/stop",
            post(handlers::stop_answer),
        )
        .route(
            "/sessions/:session_id/reattempt",
            post(handlers::reattempt),
        )
        // Recognition event feed (the platform recognizer runs client-side)
        .route(
            "/sessions/:session_id/transcript",
            post(handlers::push_transcript),
        )
        .route(
            "/sessions/:session_id/transcript/end",
            post(handlers::end_transcript),
        )
        // History
        .route("/history", get(handlers::history))
        // The browser client calls this API cross-origin
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
