//! Identity provider adapter
//!
//! Resolves a bearer token to a stable user identifier through a thin
//! verification call. No operation that needs an identity (persistence,
//! history) runs until one is resolved; a signed-out caller is `None`, not
//! an error.

pub mod client;
pub mod provider;

pub use client::AuthServiceClient;
pub use provider::{AuthError, Identity, IdentityProvider, StaticIdentityProvider};
