// Scripted Interview Demo: full session lifecycle against the real model
//
// This demo runs the complete flow without a browser client:
// 1. A question is generated for the subject given on the command line
// 2. A scripted recognition stream plays back a "spoken" answer
// 3. The model scores the answer and the saved history is printed
//
// Prerequisites:
// - GEMINI_API_KEY set in the environment
//
// Usage: cargo run --example scripted_interview -- Java

use anyhow::Result;
use interview_coach::{
    Feedback, FeedbackStore, GeminiClient, Identity, MemoryFeedbackStore, ScriptedBackend,
    SessionConfig, SessionController, SpeechEvent,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let subject = std::env::args().nth(1).unwrap_or_else(|| "Java".to_string());
    let api_key = std::env::var("GEMINI_API_KEY")?;

    let llm = Arc::new(GeminiClient::new(
        "https://generativelanguage.googleapis.com",
        "gemini-1.5-flash",
        api_key,
    ));
    let store = Arc::new(MemoryFeedbackStore::new());

    // Interim results arrive incrementally; each segment replaces the last
    let backend = ScriptedBackend::new(vec![vec![
        SpeechEvent::Segment {
            text: "a variable is a named".to_string(),
        },
        SpeechEvent::Segment {
            text: "a variable is a named storage location that holds a value of some type"
                .to_string(),
        },
    ]]);

    let controller = SessionController::new(
        SessionConfig {
            session_id: "demo".to_string(),
            restart_on_end: true,
        },
        llm,
        store.clone(),
        Box::new(backend),
        Some(Identity {
            user_id: "demo-user".to_string(),
        }),
    );

    let question = controller.request_question(&subject).await?;
    println!("Question: {question}");

    controller.start_answering().await?;
    sleep(Duration::from_millis(200)).await;

    let feedback: Feedback = controller.stop_answering().await?;
    println!("Correctness:  {}/5", feedback.correctness);
    println!("Completeness: {}/5", feedback.completeness);
    println!("Feedback:     {}", feedback.feedback);

    println!("\nHistory for demo-user:");
    for record in store.list_for_user("demo-user").await? {
        println!("  [{}] {}", record.created_at.to_rfc3339(), record.question);
    }

    controller.close().await;
    Ok(())
}
