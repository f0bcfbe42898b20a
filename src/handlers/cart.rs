use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::cart::{CartLine, CartStore};
use crate::domain::errors::DomainError;
use crate::errors::AppError;
use crate::state::AppState;

use super::{cart_session, money};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddItemRequest {
    pub product_id: String,
    /// Units to add. Defaults to 1; values below 1 count as 1.
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetQuantityRequest {
    /// New quantity. Zero or less removes the line.
    pub quantity: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PanelRequest {
    pub open: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLineResponse {
    pub product_id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&CartLine> for CartLineResponse {
    fn from(line: &CartLine) -> Self {
        let product = line.product();
        CartLineResponse {
            product_id: product.id.clone(),
            name: product.name.clone(),
            image_url: product.image_url.clone(),
            unit_price: money(&product.price),
            quantity: line.quantity(),
            line_total: money(&line.line_total()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartResponse {
    pub lines: Vec<CartLineResponse>,
    pub total_items: u64,
    pub total_price: String,
    pub is_open: bool,
}

impl From<&CartStore> for CartResponse {
    fn from(store: &CartStore) -> Self {
        CartResponse {
            lines: store.lines().iter().map(CartLineResponse::from).collect(),
            total_items: store.total_items(),
            total_price: money(&store.total_price()),
            is_open: store.is_open(),
        }
    }
}

/// Lock the session's cart, run `f` on the blocking pool with the lock held,
/// then reprice the lines from the catalog and render the result.
async fn with_catalog<F>(
    state: web::Data<AppState>,
    session: &str,
    f: F,
) -> Result<CartResponse, AppError>
where
    F: FnOnce(&AppState, &mut CartStore) -> Result<(), DomainError> + Send + 'static,
{
    let store = state.carts.open(session)?;
    let mut cart = store.lock_owned().await;

    let body = web::block(move || {
        f(&state, &mut cart)?;
        state.catalog.refresh_cart(&mut cart)?;
        Ok::<_, DomainError>(CartResponse::from(&*cart))
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(body)
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /cart
///
/// The session's cart, repriced from the catalog.
#[utoipa::path(
    get,
    path = "/cart",
    params(
        ("X-Cart-Session" = String, Header, description = "Client cart session"),
    ),
    responses(
        (status = 200, description = "Current cart", body = CartResponse),
        (status = 400, description = "Missing or invalid session"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "cart"
)]
pub async fn get_cart(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let session = cart_session(&req)?;
    let body = with_catalog(state, &session, |_, _| Ok(())).await?;

    Ok(HttpResponse::Ok().json(body))
}

/// POST /cart/items
///
/// Adds a catalog product, merging with an existing line, and opens the
/// cart panel.
#[utoipa::path(
    post,
    path = "/cart/items",
    params(
        ("X-Cart-Session" = String, Header, description = "Client cart session"),
    ),
    request_body = AddItemRequest,
    responses(
        (status = 200, description = "Item added", body = CartResponse),
        (status = 400, description = "Out of stock, or missing session"),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "cart"
)]
pub async fn add_item(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<AddItemRequest>,
) -> Result<HttpResponse, AppError> {
    let session = cart_session(&req)?;
    let AddItemRequest {
        product_id,
        quantity,
    } = body.into_inner();

    let body = with_catalog(state, &session, move |state, cart| {
        state.catalog.add_to_cart(cart, &product_id, quantity)
    })
    .await?;

    Ok(HttpResponse::Ok().json(body))
}

/// PUT /cart/items/{product_id}
#[utoipa::path(
    put,
    path = "/cart/items/{product_id}",
    params(
        ("product_id" = String, Path, description = "Product id of the line"),
        ("X-Cart-Session" = String, Header, description = "Client cart session"),
    ),
    request_body = SetQuantityRequest,
    responses(
        (status = 200, description = "Quantity updated", body = CartResponse),
        (status = 400, description = "Missing or invalid session"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "cart"
)]
pub async fn set_quantity(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<SetQuantityRequest>,
) -> Result<HttpResponse, AppError> {
    let session = cart_session(&req)?;
    let product_id = path.into_inner();
    let quantity = body.quantity;

    let body = with_catalog(state, &session, move |_, cart| {
        cart.set_quantity(&product_id, quantity);
        Ok(())
    })
    .await?;

    Ok(HttpResponse::Ok().json(body))
}

/// DELETE /cart/items/{product_id}
#[utoipa::path(
    delete,
    path = "/cart/items/{product_id}",
    params(
        ("product_id" = String, Path, description = "Product id of the line"),
        ("X-Cart-Session" = String, Header, description = "Client cart session"),
    ),
    responses(
        (status = 200, description = "Line removed, or was not present", body = CartResponse),
        (status = 400, description = "Missing or invalid session"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "cart"
)]
pub async fn remove_item(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let session = cart_session(&req)?;
    let product_id = path.into_inner();

    let body = with_catalog(state, &session, move |_, cart| {
        cart.remove(&product_id);
        Ok(())
    })
    .await?;

    Ok(HttpResponse::Ok().json(body))
}

/// DELETE /cart
#[utoipa::path(
    delete,
    path = "/cart",
    params(
        ("X-Cart-Session" = String, Header, description = "Client cart session"),
    ),
    responses(
        (status = 200, description = "Cart emptied", body = CartResponse),
        (status = 400, description = "Missing or invalid session"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "cart"
)]
pub async fn clear_cart(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let session = cart_session(&req)?;

    let body = with_catalog(state, &session, |_, cart| {
        cart.clear();
        Ok(())
    })
    .await?;

    Ok(HttpResponse::Ok().json(body))
}

/// PUT /cart/panel
///
/// Opens or closes the cart panel. Closing does not touch the lines.
#[utoipa::path(
    put,
    path = "/cart/panel",
    params(
        ("X-Cart-Session" = String, Header, description = "Client cart session"),
    ),
    request_body = PanelRequest,
    responses(
        (status = 200, description = "Panel state updated", body = CartResponse),
        (status = 400, description = "Missing or invalid session"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "cart"
)]
pub async fn set_panel(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<PanelRequest>,
) -> Result<HttpResponse, AppError> {
    let session = cart_session(&req)?;
    let open = body.open;

    let body = with_catalog(state, &session, move |_, cart| {
        cart.set_open(open);
        Ok(())
    })
    .await?;

    Ok(HttpResponse::Ok().json(body))
}
