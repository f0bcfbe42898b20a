use std::sync::Arc;

use log::{info, warn};

use crate::application::auth::require_user;
use crate::domain::cart::CartStore;
use crate::domain::checkout::{CheckoutOutcome, CheckoutRequest, CheckoutTotals, ShippingInfo};
use crate::domain::errors::DomainError;
use crate::domain::identity::AuthenticatedUser;
use crate::domain::ports::{CheckoutInitiator, IdentityProvider};

/// Hands a cart over to the payment processor.
pub struct CheckoutService<I, C> {
    identity: Arc<I>,
    initiator: C,
}

impl<I: IdentityProvider, C: CheckoutInitiator> CheckoutService<I, C> {
    pub fn new(identity: Arc<I>, initiator: C) -> Self {
        Self {
            identity,
            initiator,
        }
    }

    /// Shipping form prefilled from the signed-in user.
    pub async fn prefill(&self, access_token: Option<&str>) -> Result<ShippingInfo, DomainError> {
        let user = self.authenticate(access_token).await?;
        Ok(ShippingInfo::prefilled_for(&user))
    }

    /// The signed-in user behind `access_token`, or `AuthenticationRequired`.
    pub async fn authenticate(
        &self,
        access_token: Option<&str>,
    ) -> Result<AuthenticatedUser, DomainError> {
        require_user(self.identity.as_ref(), access_token).await
    }

    /// Open a payment session for the cart's current lines.
    ///
    /// The cart is cleared and its panel closed only once the initiator has
    /// returned a redirect URL. Any failure before that leaves the cart as it
    /// was, and without a signed-in user the initiator is never called.
    pub async fn checkout(
        &self,
        access_token: Option<&str>,
        store: &mut CartStore,
        shipping: &ShippingInfo,
    ) -> Result<CheckoutOutcome, DomainError> {
        let user = self.authenticate(access_token).await?;
        self.checkout_for(&user, access_token.unwrap_or_default(), store, shipping)
            .await
    }

    /// Checkout for a user already resolved by [`Self::authenticate`].
    pub async fn checkout_for(
        &self,
        user: &AuthenticatedUser,
        access_token: &str,
        store: &mut CartStore,
        shipping: &ShippingInfo,
    ) -> Result<CheckoutOutcome, DomainError> {
        if store.cart().is_empty() {
            return Err(DomainError::InvalidInput("cart is empty".into()));
        }
        shipping.validate()?;

        let request = CheckoutRequest::new(store.cart(), shipping);
        let totals = CheckoutTotals::for_cart(store.cart());

        let session = match self.initiator.create_session(access_token, &request).await {
            Ok(session) => session,
            Err(e) => {
                warn!("Checkout for user {} failed: {}", user.id, e);
                return Err(e);
            }
        };

        store.clear();
        store.set_open(false);
        info!(
            "Checkout started for user {} ({} items, total {})",
            user.id,
            request.items.len(),
            totals.rounded().grand_total
        );

        Ok(CheckoutOutcome {
            redirect_url: session.url,
            totals,
        })
    }
}
