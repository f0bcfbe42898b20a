pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;

use actix_web::http::header;
use actix_web::HttpRequest;
use bigdecimal::BigDecimal;
use utoipa::OpenApi;

use crate::domain::checkout::round_money;
use crate::errors::AppError;

/// Identifies the client session that owns a cart.
pub const CART_SESSION_HEADER: &str = "X-Cart-Session";

/// Access token from `Authorization: Bearer <token>`, if any.
pub fn bearer_token(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
        return None;
    }
    Some(token.trim().to_string())
}

pub fn cart_session(req: &HttpRequest) -> Result<String, AppError> {
    req.headers()
        .get(CART_SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("{CART_SESSION_HEADER} header is required")))
}

/// Two-decimal string for presentation.
pub fn money(value: &BigDecimal) -> String {
    round_money(value).to_string()
}

#[derive(OpenApi)]
#[openapi(
    paths(
        products::list_products,
        products::get_product,
        products::list_categories,
        cart::get_cart,
        cart::add_item,
        cart::set_quantity,
        cart::remove_item,
        cart::clear_cart,
        cart::set_panel,
        checkout::get_totals,
        checkout::get_prefill,
        checkout::create_checkout,
        checkout::payment_success,
        orders::list_orders,
        orders::delete_order,
    ),
    components(schemas(
        products::ProductResponse,
        products::CategoryResponse,
        cart::CartResponse,
        cart::CartLineResponse,
        cart::AddItemRequest,
        cart::SetQuantityRequest,
        cart::PanelRequest,
        checkout::TotalsResponse,
        checkout::ShippingInfoBody,
        checkout::CheckoutResponse,
        checkout::PaymentSuccessResponse,
        orders::OrderResponse,
        orders::OrderItemResponse,
    )),
    tags(
        (name = "catalog", description = "Products and categories"),
        (name = "cart", description = "Per-session shopping cart"),
        (name = "checkout", description = "Payment session hand-off"),
        (name = "orders", description = "Order history"),
    )
)]
pub struct ApiDoc;
