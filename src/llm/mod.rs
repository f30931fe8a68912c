//! Language-model adapter
//!
//! This module wraps the hosted model behind a `LanguageModel` trait so the
//! session controller never talks to the network directly:
//! - `client` - the trait plus the Gemini `generateContent` REST client
//! - `prompts` - question-generation and answer-scoring prompt builders
//! - `response` - code-fence stripping and strict JSON parsing of replies

pub mod client;
pub mod prompts;
pub mod response;

pub use client::{GeminiClient, LanguageModel, LlmError, LlmRequest};
