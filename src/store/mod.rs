//! Feedback store adapter
//!
//! Persists scored answers as immutable records in one logical collection,
//! filterable by user and ordered newest-first. The remote document store is
//! reached through a thin HTTP client; an in-memory implementation backs
//! tests and local single-process runs.

pub mod backend;
pub mod http;
pub mod memory;
pub mod record;

pub use backend::{FeedbackStore, StoreError};
pub use http::HttpFeedbackStore;
pub use memory::MemoryFeedbackStore;
pub use record::FeedbackRecord;
