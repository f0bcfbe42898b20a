pub mod cart_storage;
pub mod catalog_repo;
pub mod identity_client;
pub mod models;
pub mod order_repo;
pub mod payment_client;
pub mod seed;

#[cfg(test)]
pub(crate) mod test_db;

/// Where the hosted backend lives, shared by the identity and payment clients.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL without a trailing slash, e.g. `https://project.backend.example`.
    pub base_url: String,
    /// Public API key sent as the `apikey` header.
    pub api_key: String,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}
