use uuid::Uuid;

use super::cart::CartLine;
use super::checkout::{CheckoutRequest, CheckoutSession};
use super::errors::DomainError;
use super::identity::AuthenticatedUser;
use super::order::OrderView;
use super::product::{Category, Product};

pub trait CatalogProvider: Send + Sync + 'static {
    /// Active products, newest first.
    fn list_products(&self) -> Result<Vec<Product>, DomainError>;
    fn list_categories(&self) -> Result<Vec<Category>, DomainError>;
    fn find_product(&self, id: &str) -> Result<Option<Product>, DomainError>;
    /// Unknown ids are skipped.
    fn find_products(&self, ids: &[String]) -> Result<Vec<Product>, DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    fn list_for_user(&self, user_id: Uuid) -> Result<Vec<OrderView>, DomainError>;
    /// `false` when no order with that id belongs to the user.
    fn delete_for_user(&self, user_id: Uuid, order_id: Uuid) -> Result<bool, DomainError>;
}

/// Durable slot for one session's cart lines.
pub trait CartStorage: Send + 'static {
    fn load(&self) -> Result<Option<Vec<CartLine>>, DomainError>;
    fn save(&self, lines: &[CartLine]) -> Result<(), DomainError>;
}

pub trait IdentityProvider: Send + Sync + 'static {
    /// `None` when the token is not (or no longer) a valid session.
    async fn current_user(&self, access_token: &str)
        -> Result<Option<AuthenticatedUser>, DomainError>;
}

pub trait CheckoutInitiator: Send + Sync + 'static {
    async fn create_session(
        &self,
        access_token: &str,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, DomainError>;
}
