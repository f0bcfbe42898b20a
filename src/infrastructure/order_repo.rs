use std::collections::HashMap;

use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{OrderItemView, OrderView};
use crate::domain::ports::OrderRepository;
use crate::schema::{order_items, orders, products};

use super::models::{OrderItemRow, OrderRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn list_for_user(&self, user_id: Uuid) -> Result<Vec<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let rows = orders::table
                .filter(orders::user_id.eq(user_id))
                .order(orders::created_at.desc())
                .select(OrderRow::as_select())
                .load(conn)?;

            let order_ids: Vec<Uuid> = rows.iter().map(|o| o.id).collect();

            // Items keep showing after their product is removed from the
            // catalog, just without name and image.
            let items: Vec<(OrderItemRow, Option<String>, Option<String>)> = order_items::table
                .left_join(products::table)
                .filter(order_items::order_id.eq_any(order_ids))
                .order(order_items::created_at.asc())
                .select((
                    OrderItemRow::as_select(),
                    products::name.nullable(),
                    products::image_url.nullable(),
                ))
                .load(conn)?;

            let mut by_order: HashMap<Uuid, Vec<OrderItemView>> = HashMap::new();
            for (item, product_name, image_url) in items {
                by_order.entry(item.order_id).or_default().push(OrderItemView {
                    id: item.id,
                    product_id: item.product_id,
                    product_name,
                    image_url,
                    quantity: item.quantity,
                    price: item.price,
                });
            }

            Ok(rows
                .into_iter()
                .map(|o| OrderView {
                    items: by_order.remove(&o.id).unwrap_or_default(),
                    id: o.id,
                    user_id: o.user_id,
                    status: o.status,
                    payment_status: o.payment_status,
                    total_amount: o.total_amount,
                    shipping_address: o.shipping_address,
                    created_at: o.created_at,
                })
                .collect())
        })
    }

    fn delete_for_user(&self, user_id: Uuid, order_id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let owned = orders::table
                .filter(orders::id.eq(order_id))
                .filter(orders::user_id.eq(user_id))
                .select(orders::id)
                .first::<Uuid>(conn)
                .optional()?;
            if owned.is_none() {
                return Ok(false);
            }

            diesel::delete(order_items::table.filter(order_items::order_id.eq(order_id)))
                .execute(conn)?;
            let deleted = diesel::delete(orders::table.filter(orders::id.eq(order_id)))
                .execute(conn)?;

            Ok(deleted > 0)
        })
    }
}
