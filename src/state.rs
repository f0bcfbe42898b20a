use std::sync::Arc;

use crate::application::cart_sessions::CartSessions;
use crate::application::catalog_service::CatalogService;
use crate::application::checkout_service::CheckoutService;
use crate::application::order_service::OrderService;
use crate::config::Config;
use crate::db::DbPool;
use crate::domain::ports::CartStorage;
use crate::infrastructure::cart_storage::FileCartStorage;
use crate::infrastructure::catalog_repo::DieselCatalog;
use crate::infrastructure::identity_client::HttpIdentityProvider;
use crate::infrastructure::order_repo::DieselOrderRepository;
use crate::infrastructure::payment_client::HttpCheckoutInitiator;

/// Everything the handlers share. Built once at startup.
pub struct AppState {
    pub catalog: CatalogService<DieselCatalog>,
    pub orders: OrderService<DieselOrderRepository>,
    pub carts: CartSessions,
    pub identity: Arc<HttpIdentityProvider>,
    pub checkout: CheckoutService<HttpIdentityProvider, HttpCheckoutInitiator>,
}

impl AppState {
    pub fn new(pool: DbPool, config: &Config) -> Self {
        let http = reqwest::Client::new();
        let identity = Arc::new(HttpIdentityProvider::new(
            config.backend.clone(),
            http.clone(),
        ));
        let initiator = HttpCheckoutInitiator::new(config.backend.clone(), http);

        let carts = match &config.cart_storage_dir {
            Some(root) => {
                let root = root.clone();
                CartSessions::with_storage(move |session| {
                    Box::new(FileCartStorage::for_session(&root, session)) as Box<dyn CartStorage>
                })
            }
            None => CartSessions::in_memory(),
        }
        .with_limits(config.cart_session_limit, config.cart_idle_ttl);

        Self {
            catalog: CatalogService::new(DieselCatalog::new(pool.clone())),
            orders: OrderService::new(DieselOrderRepository::new(pool)),
            carts,
            identity: Arc::clone(&identity),
            checkout: CheckoutService::new(identity, initiator),
        }
    }
}
