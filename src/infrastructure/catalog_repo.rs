use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogProvider;
use crate::domain::product::{Category, Product};
use crate::schema::{categories, products};

use super::models::{CategoryRow, ProductRow};

pub struct DieselCatalog {
    pool: DbPool,
}

impl DieselCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CatalogProvider for DieselCatalog {
    fn list_products(&self) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = products::table
            .filter(products::active.eq(true))
            .order(products::created_at.desc())
            .select(ProductRow::as_select())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = categories::table
            .order(categories::name.asc())
            .select(CategoryRow::as_select())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    fn find_product(&self, id: &str) -> Result<Option<Product>, DomainError> {
        // Ids that are not UUIDs cannot exist in this table.
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(None);
        };
        let mut conn = self.pool.get()?;

        let row = products::table
            .filter(products::id.eq(id))
            .filter(products::active.eq(true))
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(Product::from))
    }

    fn find_products(&self, ids: &[String]) -> Result<Vec<Product>, DomainError> {
        let ids: Vec<Uuid> = ids
            .iter()
            .filter_map(|id| Uuid::parse_str(id).ok())
            .collect();
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let mut conn = self.pool.get()?;

        let rows = products::table
            .filter(products::id.eq_any(ids))
            .filter(products::active.eq(true))
            .select(ProductRow::as_select())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(Product::from).collect())
    }
}
