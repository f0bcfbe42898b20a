use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use diesel::prelude::*;
use log::{debug, info, warn};
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::product::{Product, ProductPayload};
use crate::schema::{categories, products};

use super::models::NewProductRow;

/// Load a JSON product dataset into an empty catalog.
///
/// Records may use either field naming; each is normalised to [`Product`]
/// before insert. Invalid records are skipped with a warning. Legacy category
/// names become categories, reusing any existing category of the same name.
/// Returns the number of products inserted, `0` if the catalog already had
/// products.
pub fn seed_catalog(pool: &DbPool, path: &Path) -> Result<usize, DomainError> {
    let raw = fs::read(path)
        .map_err(|e| DomainError::Internal(format!("seed {}: {}", path.display(), e)))?;
    let payloads: Vec<ProductPayload> = serde_json::from_slice(&raw)
        .map_err(|e| DomainError::InvalidInput(format!("seed {}: {}", path.display(), e)))?;

    let mut rows: Vec<(Option<String>, NewProductRow)> = payloads
        .into_iter()
        .filter_map(|payload| {
            let id = payload.id.clone();
            match Product::try_from(payload) {
                Ok(product) => {
                    let row = NewProductRow::from(&product);
                    let label = product.category_id.filter(|_| row.category_id.is_none());
                    Some((label, row))
                }
                Err(e) => {
                    warn!("Skipping seed product '{}': {}", id, e);
                    None
                }
            }
        })
        .collect();
    if rows.is_empty() {
        warn!("Seed file {} has no usable products", path.display());
        return Ok(0);
    }

    let mut conn = pool.get()?;
    conn.transaction::<_, DomainError, _>(|conn| {
        let existing: i64 = products::table.count().get_result(conn)?;
        if existing > 0 {
            info!("Catalog already has {} products, not seeding", existing);
            return Ok(0);
        }

        let mut category_ids: BTreeMap<String, Uuid> = BTreeMap::new();
        for (label, row) in rows.iter_mut() {
            let Some(name) = label.as_deref().map(str::trim).filter(|n| !n.is_empty()) else {
                continue;
            };
            let id = match category_ids.get(name) {
                Some(id) => *id,
                None => {
                    let id = category_named(conn, name)?;
                    category_ids.insert(name.to_string(), id);
                    id
                }
            };
            row.category_id = Some(id);
        }
        debug!("Seed uses {} legacy categories", category_ids.len());

        let rows: Vec<NewProductRow> = rows.into_iter().map(|(_, row)| row).collect();
        let inserted = diesel::insert_into(products::table)
            .values(&rows)
            .execute(conn)?;
        info!("Seeded catalog with {} products", inserted);
        Ok(inserted)
    })
}

fn category_named(conn: &mut PgConnection, name: &str) -> Result<Uuid, DomainError> {
    let existing = categories::table
        .filter(categories::name.eq(name))
        .select(categories::id)
        .first::<Uuid>(conn)
        .optional()?;
    match existing {
        Some(id) => Ok(id),
        None => Ok(diesel::insert_into(categories::table)
            .values(categories::name.eq(name))
            .returning(categories::id)
            .get_result(conn)?),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::domain::ports::CatalogProvider;
    use crate::infrastructure::catalog_repo::DieselCatalog;
    use crate::infrastructure::test_db::setup_db;

    const DATASET: &str = r#"[
        {"id": "1", "name": "Premium Wireless Headphones", "price": 299.99,
         "originalPrice": 399.99, "image": "/assets/headphones.jpg", "inStock": true,
         "category": "Electronics"},
        {"id": "2", "name": "Modern Smartphone", "price": "899.99", "stock_quantity": 5,
         "category": "Electronics"},
        {"id": "3", "name": "", "price": 10}
    ]"#;

    #[tokio::test]
    async fn seeds_empty_catalog_once() {
        let (_container, pool) = setup_db().await;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DATASET.as_bytes()).unwrap();

        assert_eq!(seed_catalog(&pool, file.path()).unwrap(), 2);
        assert_eq!(seed_catalog(&pool, file.path()).unwrap(), 0);

        let catalog = DieselCatalog::new(pool);
        let listed = catalog.list_products().unwrap();
        assert_eq!(listed.len(), 2);
        let headphones = listed
            .iter()
            .find(|p| p.name == "Premium Wireless Headphones")
            .unwrap();
        assert_eq!(headphones.discount_percentage(), Some(25));
        assert_eq!(headphones.image_url.as_deref(), Some("/assets/headphones.jpg"));
        assert!(headphones.in_stock());

        let categories = catalog.list_categories().unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Electronics");
        assert!(listed
            .iter()
            .all(|p| p.category_id.as_deref() == Some(categories[0].id.as_str())));
    }
}
