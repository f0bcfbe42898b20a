use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
}

impl AuthenticatedUser {
    /// First word, then the second word, of the full name.
    pub fn split_name(&self) -> (String, String) {
        let mut parts = self
            .full_name
            .as_deref()
            .unwrap_or_default()
            .split_whitespace();
        let first = parts.next().unwrap_or_default().to_string();
        let last = parts.next().unwrap_or_default().to_string();
        (first, last)
    }
}
