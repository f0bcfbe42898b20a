//! Client for the backend function that opens a hosted payment session.

use reqwest::Client;
use serde::Deserialize;

use crate::domain::checkout::{CheckoutRequest, CheckoutSession};
use crate::domain::errors::DomainError;
use crate::domain::ports::CheckoutInitiator;

use super::BackendConfig;

#[derive(Debug, Clone)]
pub struct HttpCheckoutInitiator {
    config: BackendConfig,
    http: Client,
}

impl HttpCheckoutInitiator {
    pub fn new(config: BackendConfig, http: Client) -> Self {
        Self { config, http }
    }
}

impl CheckoutInitiator for HttpCheckoutInitiator {
    async fn create_session(
        &self,
        access_token: &str,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, DomainError> {
        let url = format!("{}/functions/v1/create-payment", self.config.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .header("apikey", &self.config.api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(DomainError::Upstream(format!(
                "create-payment failed with status {status}: {text}"
            )));
        }

        let parsed: CreatePaymentResponse = response.json().await?;
        session_from(parsed)
    }
}

#[derive(Debug, Deserialize)]
struct CreatePaymentResponse {
    #[serde(default)]
    url: Option<String>,
}

fn session_from(parsed: CreatePaymentResponse) -> Result<CheckoutSession, DomainError> {
    match parsed.url.filter(|u| !u.trim().is_empty()) {
        Some(url) => Ok(CheckoutSession { url }),
        None => Err(DomainError::Upstream("No checkout URL received".into())),
    }
}
