use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::checkout::{
    order_reference, tax_rate, CheckoutTotals, ShippingInfo, DEFAULT_COUNTRY,
};
use crate::domain::errors::DomainError;
use crate::errors::AppError;
use crate::state::AppState;

use super::{bearer_token, cart_session};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct TotalsResponse {
    pub total_items: u64,
    pub subtotal: String,
    /// Tax rate as a fraction, e.g. "0.08"
    pub tax_rate: String,
    pub tax: String,
    pub grand_total: String,
}

impl TotalsResponse {
    fn new(total_items: u64, totals: &CheckoutTotals) -> Self {
        let rounded = totals.rounded();
        TotalsResponse {
            total_items,
            subtotal: rounded.subtotal.to_string(),
            tax_rate: tax_rate().to_string(),
            tax: rounded.tax.to_string(),
            grand_total: rounded.grand_total.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShippingInfoBody {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    /// Defaults to "United States"
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

impl From<ShippingInfoBody> for ShippingInfo {
    fn from(b: ShippingInfoBody) -> Self {
        ShippingInfo {
            first_name: b.first_name,
            last_name: b.last_name,
            email: b.email,
            address: b.address,
            city: b.city,
            state: b.state,
            zip_code: b.zip_code,
            country: b.country,
        }
    }
}

impl From<ShippingInfo> for ShippingInfoBody {
    fn from(s: ShippingInfo) -> Self {
        ShippingInfoBody {
            first_name: s.first_name,
            last_name: s.last_name,
            email: s.email,
            address: s.address,
            city: s.city,
            state: s.state,
            zip_code: s.zip_code,
            country: s.country,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    /// Hosted payment page to send the customer to
    pub url: String,
    pub subtotal: String,
    pub tax: String,
    pub grand_total: String,
}

#[derive(Debug, Deserialize)]
pub struct PaymentSuccessParams {
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentSuccessResponse {
    pub message: String,
    /// Last eight characters of the payment session id
    pub order_reference: Option<String>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /checkout/totals
///
/// Subtotal, tax and grand total for the session's cart at current catalog
/// prices.
#[utoipa::path(
    get,
    path = "/checkout/totals",
    params(
        ("X-Cart-Session" = String, Header, description = "Client cart session"),
    ),
    responses(
        (status = 200, description = "Order summary", body = TotalsResponse),
        (status = 400, description = "Missing or invalid session"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "checkout"
)]
pub async fn get_totals(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let session = cart_session(&req)?;
    let store = state.carts.open(&session)?;
    let mut cart = store.lock_owned().await;

    let body = web::block(move || {
        state.catalog.refresh_cart(&mut cart)?;
        let totals = CheckoutTotals::for_cart(cart.cart());
        Ok::<_, DomainError>(TotalsResponse::new(cart.total_items(), &totals))
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(body))
}

/// GET /checkout/prefill
///
/// Shipping form defaults for the signed-in user.
#[utoipa::path(
    get,
    path = "/checkout/prefill",
    responses(
        (status = 200, description = "Prefilled shipping details", body = ShippingInfoBody),
        (status = 401, description = "Not signed in"),
        (status = 502, description = "Identity provider unavailable"),
    ),
    tag = "checkout"
)]
pub async fn get_prefill(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let token = bearer_token(&req);
    let info = state.checkout.prefill(token.as_deref()).await?;

    Ok(HttpResponse::Ok().json(ShippingInfoBody::from(info)))
}

/// POST /checkout
///
/// Opens a payment session for the cart. The cart is emptied only when the
/// processor returns a redirect URL.
#[utoipa::path(
    post,
    path = "/checkout",
    params(
        ("X-Cart-Session" = String, Header, description = "Client cart session"),
    ),
    request_body = ShippingInfoBody,
    responses(
        (status = 200, description = "Payment session created", body = CheckoutResponse),
        (status = 400, description = "Empty cart or incomplete shipping details"),
        (status = 401, description = "Not signed in"),
        (status = 502, description = "Payment session could not be created"),
    ),
    tag = "checkout"
)]
pub async fn create_checkout(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<ShippingInfoBody>,
) -> Result<HttpResponse, AppError> {
    let session = cart_session(&req)?;
    let token = bearer_token(&req);
    // Signed-out callers are turned away before the cart or catalog is touched.
    let user = state.checkout.authenticate(token.as_deref()).await?;
    let shipping = ShippingInfo::from(body.into_inner());

    let store = state.carts.open(&session)?;
    let cart = store.lock_owned().await;

    let refresh_state = state.clone();
    let mut cart = web::block(move || {
        let mut cart = cart;
        refresh_state.catalog.refresh_cart(&mut cart).map(|_| cart)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let outcome = state
        .checkout
        .checkout_for(
            &user,
            token.as_deref().unwrap_or_default(),
            &mut cart,
            &shipping,
        )
        .await?;
    let totals = outcome.totals.rounded();

    Ok(HttpResponse::Ok().json(CheckoutResponse {
        url: outcome.redirect_url,
        subtotal: totals.subtotal.to_string(),
        tax: totals.tax.to_string(),
        grand_total: totals.grand_total.to_string(),
    }))
}

/// GET /payment/success
///
/// Landing page after the processor redirects back.
#[utoipa::path(
    get,
    path = "/payment/success",
    params(
        ("session_id" = Option<String>, Query, description = "Payment session id"),
    ),
    responses(
        (status = 200, description = "Payment confirmation", body = PaymentSuccessResponse),
    ),
    tag = "checkout"
)]
pub async fn payment_success(query: web::Query<PaymentSuccessParams>) -> HttpResponse {
    let reference = query
        .session_id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
        .map(order_reference);

    HttpResponse::Ok().json(PaymentSuccessResponse {
        message: "Thank you for your purchase! Your order has been placed.".to_string(),
        order_reference: reference,
    })
}
