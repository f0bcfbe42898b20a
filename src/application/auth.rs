use crate::domain::errors::DomainError;
use crate::domain::identity::AuthenticatedUser;
use crate::domain::ports::IdentityProvider;

/// Resolve the caller's session or fail with `AuthenticationRequired`.
/// Without a token the identity provider is not consulted.
pub async fn require_user<I: IdentityProvider>(
    identity: &I,
    access_token: Option<&str>,
) -> Result<AuthenticatedUser, DomainError> {
    let Some(token) = access_token.filter(|t| !t.trim().is_empty()) else {
        return Err(DomainError::AuthenticationRequired);
    };
    identity
        .current_user(token)
        .await?
        .ok_or(DomainError::AuthenticationRequired)
}
