use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode, Zero};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::DomainError;

const MAX_PRICE_EXCLUSIVE: i64 = 100_000_000;

/// Stock availability as reported by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Stock {
    Count(u32),
    Available(bool),
}

impl Stock {
    pub fn in_stock(&self) -> bool {
        match self {
            Stock::Count(n) => *n > 0,
            Stock::Available(flag) => *flag,
        }
    }
}

/// Canonical product shape. The cart only ever reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub original_price: Option<BigDecimal>,
    pub image_url: Option<String>,
    pub category_id: Option<String>,
    pub stock: Stock,
    pub featured: bool,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock.in_stock()
    }

    /// Whole-percent markdown from the original price, if there is one.
    pub fn discount_percentage(&self) -> Option<u32> {
        let original = self.original_price.as_ref()?;
        if original <= &self.price || original.is_zero() {
            return None;
        }
        let pct = (original - &self.price) * BigDecimal::from(100) / original;
        pct.with_scale_round(0, RoundingMode::HalfUp)
            .to_string()
            .parse()
            .ok()
    }

    /// Case-insensitive substring match on the name or description. An empty
    /// term matches everything.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.name.to_lowercase().contains(&term)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&term))
    }
}

/// Category filter value that selects every category.
pub const ALL_CATEGORIES: &str = "All";

/// Storefront listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub search: Option<String>,
    /// Category name. Absent, blank or [`ALL_CATEGORIES`] means no filter.
    pub category: Option<String>,
}

impl ProductQuery {
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn category_filter(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(ALL_CATEGORIES))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl Category {
    /// Matches a filter value by name, ignoring case, or by exact id.
    pub fn is_selected_by(&self, filter: &str) -> bool {
        self.name.to_lowercase() == filter.to_lowercase() || self.id == filter
    }
}

/// Product record as it arrives from outside, in either the database field
/// naming or the older mock-dataset naming.
///
/// The database names win when both are present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPayload {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Value,
    #[serde(default)]
    pub original_price: Option<Value>,
    #[serde(default, rename = "originalPrice")]
    pub legacy_original_price: Option<Value>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, rename = "image")]
    pub legacy_image: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default, rename = "category")]
    pub legacy_category: Option<String>,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    #[serde(default, rename = "inStock")]
    pub legacy_in_stock: Option<bool>,
    #[serde(default)]
    pub featured: bool,
}

impl TryFrom<ProductPayload> for Product {
    type Error = DomainError;

    fn try_from(p: ProductPayload) -> Result<Self, Self::Error> {
        if p.id.trim().is_empty() {
            return Err(DomainError::InvalidInput("product id is empty".into()));
        }
        if p.name.trim().is_empty() {
            return Err(DomainError::InvalidInput(format!(
                "product '{}' has no name",
                p.id
            )));
        }

        let price = decimal_from_json(&p.price)?;
        check_money(&p.id, "price", &price)?;

        let original_price = p
            .original_price
            .as_ref()
            .or(p.legacy_original_price.as_ref())
            .filter(|v| !v.is_null())
            .map(decimal_from_json)
            .transpose()?;
        if let Some(original) = &original_price {
            check_money(&p.id, "original price", original)?;
        }

        let stock = match (p.stock_quantity, p.legacy_in_stock) {
            (Some(n), _) => Stock::Count(u32::try_from(n.max(0)).unwrap_or(u32::MAX)),
            (None, Some(flag)) => Stock::Available(flag),
            (None, None) => Stock::Available(true),
        };

        Ok(Product {
            id: p.id,
            name: p.name,
            description: p.description,
            price,
            original_price,
            image_url: p.image_url.or(p.legacy_image),
            category_id: p.category_id.or(p.legacy_category),
            stock,
            featured: p.featured,
        })
    }
}

/// Prices are stored as NUMERIC(10, 2): whole cents below 10^8.
fn check_money(id: &str, field: &str, value: &BigDecimal) -> Result<(), DomainError> {
    let problem = if value < &BigDecimal::zero() {
        "is negative"
    } else if value.with_scale(2) != *value {
        "has more than two decimal places"
    } else if value >= &BigDecimal::from(MAX_PRICE_EXCLUSIVE) {
        "is too large"
    } else {
        return Ok(());
    };
    Err(DomainError::InvalidInput(format!(
        "product '{id}' {field} {value} {problem}"
    )))
}

/// Parse a JSON number or string into an exact decimal.
///
/// Numbers go through their shortest textual form so `299.99` stays `299.99`
/// rather than picking up binary float noise.
pub fn decimal_from_json(value: &Value) -> Result<BigDecimal, DomainError> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        other => {
            return Err(DomainError::InvalidInput(format!(
                "expected a decimal, got {other}"
            )))
        }
    };
    BigDecimal::from_str(&text)
        .map_err(|e| DomainError::InvalidInput(format!("invalid decimal '{text}': {e}")))
}
