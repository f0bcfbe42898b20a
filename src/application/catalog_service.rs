use log::debug;

use crate::domain::cart::CartStore;
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogProvider;
use crate::domain::product::{Category, Product, ProductQuery};

/// Catalog reads, and the hand-off of catalog products into a cart.
pub struct CatalogService<C> {
    catalog: C,
}

impl<C: CatalogProvider> CatalogService<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    /// Active products narrowed by a category name and a search term. A
    /// category name the catalog does not know selects nothing.
    pub fn search_products(&self, query: &ProductQuery) -> Result<Vec<Product>, DomainError> {
        let mut products = self.catalog.list_products()?;

        if let Some(filter) = query.category_filter() {
            let selected: Vec<String> = self
                .catalog
                .list_categories()?
                .into_iter()
                .filter(|c| c.is_selected_by(filter))
                .map(|c| c.id)
                .collect();
            products.retain(|p| {
                p.category_id
                    .as_ref()
                    .is_some_and(|id| selected.contains(id))
            });
        }
        if let Some(term) = query.search_term() {
            products.retain(|p| p.matches_search(term));
        }

        debug!("Catalog query {:?} matched {} products", query, products.len());
        Ok(products)
    }

    pub fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        self.catalog.list_categories()
    }

    pub fn get_product(&self, id: &str) -> Result<Product, DomainError> {
        self.catalog.find_product(id)?.ok_or(DomainError::NotFound)
    }

    pub fn add_to_cart(
        &self,
        store: &mut CartStore,
        product_id: &str,
        quantity: i64,
    ) -> Result<(), DomainError> {
        let product = self.get_product(product_id)?;
        if !product.in_stock() {
            return Err(DomainError::InvalidInput(format!(
                "'{}' is out of stock",
                product.name
            )));
        }
        store.add(product, quantity);
        Ok(())
    }

    /// Swap the catalog's current records into the cart so totals use live
    /// prices. Products no longer in the catalog keep their last known record.
    pub fn refresh_cart(&self, store: &mut CartStore) -> Result<(), DomainError> {
        let ids: Vec<String> = store.lines().iter().map(|l| l.product().id.clone()).collect();
        if ids.is_empty() {
            return Ok(());
        }
        let current = self.catalog.find_products(&ids)?;
        debug!("Refreshing {} of {} cart products", current.len(), ids.len());
        for product in current {
            store.refresh_product(product);
        }
        Ok(())
    }
}
