use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::auth::require_user;
use crate::domain::order::{OrderItemView, OrderView};
use crate::errors::AppError;
use crate::state::AppState;

use super::{bearer_token, money};

// ── Response DTOs ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: Uuid,
    /// Absent once the product has been removed from the catalog
    pub product_id: Option<Uuid>,
    pub product_name: Option<String>,
    pub image_url: Option<String>,
    pub quantity: i32,
    /// Unit price charged, e.g. "9.99"
    pub price: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub status: String,
    pub payment_status: String,
    pub total_amount: String,
    pub shipping_address: Option<String>,
    pub created_at: String,
    pub items: Vec<OrderItemResponse>,
}

impl From<OrderItemView> for OrderItemResponse {
    fn from(i: OrderItemView) -> Self {
        OrderItemResponse {
            id: i.id,
            product_id: i.product_id,
            product_name: i.product_name,
            image_url: i.image_url,
            quantity: i.quantity,
            price: money(&i.price),
        }
    }
}

impl From<OrderView> for OrderResponse {
    fn from(o: OrderView) -> Self {
        OrderResponse {
            id: o.id,
            status: o.status,
            payment_status: o.payment_status,
            total_amount: money(&o.total_amount),
            shipping_address: o.shipping_address,
            created_at: o.created_at.to_rfc3339(),
            items: o.items.into_iter().map(OrderItemResponse::from).collect(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /orders
///
/// The signed-in user's orders, newest first, with their items.
#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "Order history", body = [OrderResponse]),
        (status = 401, description = "Not signed in"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let token = bearer_token(&req);
    let user = require_user(state.identity.as_ref(), token.as_deref()).await?;

    let orders = web::block(move || state.orders.order_history(user.id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// DELETE /orders/{id}
///
/// Removes one of the signed-in user's orders together with its items.
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn delete_order(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let token = bearer_token(&req);
    let user = require_user(state.identity.as_ref(), token.as_deref()).await?;

    web::block(move || state.orders.delete_order(user.id, order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}
