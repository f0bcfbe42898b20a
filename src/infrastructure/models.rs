use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::product::{Category, Product, Stock};
use crate::schema::{categories, order_items, orders, products};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub original_price: Option<BigDecimal>,
    pub image_url: Option<String>,
    pub category_id: Option<Uuid>,
    pub stock_quantity: i32,
    pub featured: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id.to_string(),
            name: row.name,
            description: row.description,
            price: row.price,
            original_price: row.original_price,
            image_url: row.image_url,
            category_id: row.category_id.map(|id| id.to_string()),
            stock: Stock::Count(u32::try_from(row.stock_quantity.max(0)).unwrap_or_default()),
            featured: row.featured,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub original_price: Option<BigDecimal>,
    pub image_url: Option<String>,
    pub category_id: Option<Uuid>,
    pub stock_quantity: i32,
    pub featured: bool,
    pub active: bool,
}

impl From<&Product> for NewProductRow {
    /// Fresh database id. A category that is not a UUID (a legacy category
    /// name) is left unset.
    fn from(product: &Product) -> Self {
        let stock_quantity = match product.stock {
            Stock::Count(n) => i32::try_from(n).unwrap_or(i32::MAX),
            Stock::Available(true) => 1,
            Stock::Available(false) => 0,
        };
        NewProductRow {
            id: Uuid::new_v4(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.clone(),
            original_price: product.original_price.clone(),
            image_url: product.image_url.clone(),
            category_id: product
                .category_id
                .as_deref()
                .and_then(|id| Uuid::parse_str(id).ok()),
            stock_quantity,
            featured: product.featured,
            active: true,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CategoryRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id.to_string(),
            name: row.name,
            description: row.description,
            image_url: row.image_url,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub payment_status: String,
    pub total_amount: BigDecimal,
    pub shipping_address: Option<String>,
    pub payment_session_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub payment_status: String,
    pub total_amount: BigDecimal,
    pub shipping_address: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Option<Uuid>,
    pub quantity: i32,
    pub price: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Option<Uuid>,
    pub quantity: i32,
    pub price: BigDecimal,
}
