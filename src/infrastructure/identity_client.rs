//! Client for the hosted identity provider's "current user" endpoint.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::identity::AuthenticatedUser;
use crate::domain::ports::IdentityProvider;

use super::BackendConfig;

impl From<reqwest::Error> for DomainError {
    fn from(e: reqwest::Error) -> Self {
        DomainError::Upstream(e.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct HttpIdentityProvider {
    config: BackendConfig,
    http: Client,
}

impl HttpIdentityProvider {
    pub fn new(config: BackendConfig, http: Client) -> Self {
        Self { config, http }
    }
}

impl IdentityProvider for HttpIdentityProvider {
    async fn current_user(
        &self,
        access_token: &str,
    ) -> Result<Option<AuthenticatedUser>, DomainError> {
        let url = format!("{}/auth/v1/user", self.config.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .header("apikey", &self.config.api_key)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Ok(None),
            status if !status.is_success() => {
                let text = response.text().await.unwrap_or_default();
                return Err(DomainError::Upstream(format!(
                    "user lookup failed with status {status}: {text}"
                )));
            }
            _ => {}
        }

        let user: UserResponse = response.json().await?;
        Ok(Some(user.into()))
    }
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    #[serde(default)]
    full_name: Option<String>,
}

impl From<UserResponse> for AuthenticatedUser {
    fn from(u: UserResponse) -> Self {
        AuthenticatedUser {
            id: u.id,
            email: u.email.unwrap_or_default(),
            full_name: u.user_metadata.full_name.filter(|n| !n.trim().is_empty()),
        }
    }
}
