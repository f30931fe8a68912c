use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::provider::{AuthError, Identity, IdentityProvider};

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    user_id: String,
}

/// Thin client for the hosted identity provider's session-verification call
pub struct AuthServiceClient {
    client: Client,
    verify_url: String,
}

impl AuthServiceClient {
    pub fn new(verify_url: &str) -> Self {
        Self {
            client: Client::new(),
            verify_url: verify_url.to_string(),
        }
    }
}

#[async_trait]
impl IdentityProvider for AuthServiceClient {
    async fn resolve(&self, bearer_token: &str) -> Result<Option<Identity>, AuthError> {
        let response = self
            .client
            .get(&self.verify_url)
            .bearer_auth(bearer_token)
            .send()
            .await?;

        let status = response.status();

        // An invalid or expired token is a signed-out caller, not a failure
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Ok(None);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AuthError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let verified: VerifyResponse = response.json().await?;
        Ok(Some(Identity {
            user_id: verified.user_id,
        }))
    }

    fn name(&self) -> &str {
        "auth-service"
    }
}
