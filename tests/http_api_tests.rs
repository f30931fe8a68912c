// Integration tests for the HTTP control surface
//
// These drive the axum router directly with a canned language model, the
// in-memory store, and the static identity provider.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use interview_coach::{
    create_router, AppState, Feedback, FeedbackRecord, FeedbackStore, LanguageModel, LlmError,
    LlmRequest, MemoryFeedbackStore, StaticIdentityProvider,
};
use tokio::sync::Mutex;
use tower::ServiceExt;

struct CannedModel {
    replies: Mutex<VecDeque<String>>,
}

impl CannedModel {
    fn new(replies: Vec<&str>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().map(String::from).collect()),
        })
    }
}

#[async_trait]
impl LanguageModel for CannedModel {
    async fn generate(&self, _request: LlmRequest) -> Result<String, LlmError> {
        let mut replies = self.replies.lock().await;
        replies.pop_front().ok_or(LlmError::Api {
            status: 500,
            message: "no canned reply left".to_string(),
        })
    }

    fn name(&self) -> &str {
        "canned"
    }
}

fn test_state(replies: Vec<&str>, store: Arc<MemoryFeedbackStore>, user: Option<&str>) -> AppState {
    let identity = match user {
        Some(user_id) => StaticIdentityProvider::signed_in(user_id),
        None => StaticIdentityProvider::signed_out(),
    };
    AppState::new(CannedModel::new(replies), store, Arc::new(identity))
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = create_router(test_state(vec![], Arc::new(MemoryFeedbackStore::new()), None));

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_and_inspect_session() {
    let app = create_router(test_state(vec![], Arc::new(MemoryFeedbackStore::new()), None));

    let response = app
        .clone()
        .oneshot(post_json("/sessions", "{\"session_id\": \"s-1\"}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let created = body_json(response).await;
    assert_eq!(created["session_id"], "s-1");
    assert_eq!(created["signed_in"], false);

    let response = app.oneshot(get("/sessions/s-1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let snapshot = body_json(response).await;
    assert_eq!(snapshot["session_id"], "s-1");
    assert!(snapshot["question"].is_null());
    assert_eq!(snapshot["transcript"], "");
    assert_eq!(snapshot["listening"], false);
}

#[tokio::test]
async fn test_duplicate_session_conflicts() {
    let app = create_router(test_state(vec![], Arc::new(MemoryFeedbackStore::new()), None));

    let first = app
        .clone()
        .oneshot(post_json("/sessions", "{\"session_id\": \"s-1\"}"))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(post_json("/sessions", "{\"session_id\": \"s-1\"}"))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let app = create_router(test_state(vec![], Arc::new(MemoryFeedbackStore::new()), None));

    let response = app.oneshot(get("/sessions/missing")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_full_answer_flow_over_http() {
    let store = Arc::new(MemoryFeedbackStore::new());
    let app = create_router(test_state(
        vec![
            "{\"question\": \"What is a variable?\"}",
            "```json\n{\"correctness\": 4, \"completeness\": 3, \"feedback\": \"Good.\"}\n```",
        ],
        store.clone(),
        Some("user-1"),
    ));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/sessions")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, "Bearer token-1")
                .body(Body::from("{\"session_id\": \"s-1\"}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["signed_in"], true);

    let response = app
        .clone()
        .oneshot(post_json("/sessions/s-1/question", "{\"subject\": \"Java\"}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["question"], "What is a variable?");

    let response = app
        .clone()
        .oneshot(post_json("/sessions/s-1/answer/start", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post_json(
            "/sessions/s-1/transcript",
            "{\"text\": \"A variable stores a value\"}",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post_json("/sessions/s-1/answer/stop", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let answer = body_json(response).await;
    assert_eq!(answer["feedback"]["correctness"], 4);
    assert_eq!(answer["feedback"]["completeness"], 3);
    assert_eq!(answer["feedback"]["feedback"], "Good.");

    let records = store.list_for_user("user-1").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].transcript, "A variable stores a value");
}

#[tokio::test]
async fn test_history_without_identity_is_empty() {
    let store = Arc::new(MemoryFeedbackStore::new());
    store
        .save(&FeedbackRecord::new(
            "q",
            "a",
            Feedback::no_answer(),
            "someone-else",
        ))
        .await
        .unwrap();

    let app = create_router(test_state(vec![], store, None));

    let response = app.oneshot(get("/history")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!([]));
}

#[tokio::test]
async fn test_history_lists_own_records() {
    let store = Arc::new(MemoryFeedbackStore::new());
    store
        .save(&FeedbackRecord::new(
            "What is a trait?",
            "a shared interface",
            Feedback {
                correctness: 5,
                completeness: 4,
                feedback: "Nice.".to_string(),
            },
            "user-1",
        ))
        .await
        .unwrap();

    let app = create_router(test_state(vec![], store, Some("user-1")));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/history")
                .header(header::AUTHORIZATION, "Bearer token-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let records = body_json(response).await;
    assert_eq!(records.as_array().unwrap().len(), 1);
    assert_eq!(records[0]["question"], "What is a trait?");
    assert_eq!(records[0]["feedback"]["correctness"], 5);
}

#[tokio::test]
async fn test_transcript_without_active_stream_conflicts() {
    let app = create_router(test_state(vec![], Arc::new(MemoryFeedbackStore::new()), None));

    let response = app
        .clone()
        .oneshot(post_json("/sessions", "{\"session_id\": \"s-1\"}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(post_json(
            "/sessions/s-1/transcript",
            "{\"text\": \"nobody is listening\"}",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_close_session_removes_it() {
    let app = create_router(test_state(vec![], Arc::new(MemoryFeedbackStore::new()), None));

    let response = app
        .clone()
        .oneshot(post_json("/sessions", "{\"session_id\": \"s-1\"}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/sessions/s-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/sessions/s-1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
