use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("identity request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("identity provider returned {status}: {message}")]
    Api { status: u16, message: String },
}

/// Identity provider trait
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve a bearer token; `None` means signed out
    async fn resolve(&self, bearer_token: &str) -> Result<Option<Identity>, AuthError>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

/// Fixed identity for tests and local single-user runs
pub struct StaticIdentityProvider {
    identity: Option<Identity>,
}

impl StaticIdentityProvider {
    /// Every token resolves to the given user
    pub fn signed_in(user_id: &str) -> Self {
        Self {
            identity: Some(Identity {
                user_id: user_id.to_string(),
            }),
        }
    }

    /// Every token resolves to signed out
    pub fn signed_out() -> Self {
        Self { identity: None }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn resolve(&self, _bearer_token: &str) -> Result<Option<Identity>, AuthError> {
        Ok(self.identity.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}
