use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::product::{Category, Product, ProductQuery, Stock};
use crate::errors::AppError;
use crate::state::AppState;

use super::money;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQueryParams {
    /// Case-insensitive text matched against name and description
    pub search: Option<String>,
    /// Category name; "All" or absent lists every category
    pub category: Option<String>,
}

impl From<ProductQueryParams> for ProductQuery {
    fn from(p: ProductQueryParams) -> Self {
        ProductQuery {
            search: p.search,
            category: p.category,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Decimal price as a string, e.g. "9.99"
    pub price: String,
    pub original_price: Option<String>,
    /// Whole-percent markdown, present only when discounted
    pub discount_percentage: Option<u32>,
    pub image_url: Option<String>,
    pub category_id: Option<String>,
    pub in_stock: bool,
    /// Units on hand, when the catalog tracks a count
    pub stock_quantity: Option<u32>,
    pub featured: bool,
}

impl From<&Product> for ProductResponse {
    fn from(p: &Product) -> Self {
        let stock_quantity = match p.stock {
            Stock::Count(n) => Some(n),
            Stock::Available(_) => None,
        };
        ProductResponse {
            id: p.id.clone(),
            name: p.name.clone(),
            description: p.description.clone(),
            price: money(&p.price),
            original_price: p.original_price.as_ref().map(money),
            discount_percentage: p.discount_percentage(),
            image_url: p.image_url.clone(),
            category_id: p.category_id.clone(),
            in_stock: p.in_stock(),
            stock_quantity,
            featured: p.featured,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        CategoryResponse {
            id: c.id,
            name: c.name,
            description: c.description,
            image_url: c.image_url,
        }
    }
}

/// GET /products
///
/// Active products, newest first, optionally filtered by search text and
/// category.
#[utoipa::path(
    get,
    path = "/products",
    params(ProductQueryParams),
    responses(
        (status = 200, description = "Catalog products", body = [ProductResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "catalog"
)]
pub async fn list_products(
    state: web::Data<AppState>,
    query: web::Query<ProductQueryParams>,
) -> Result<HttpResponse, AppError> {
    let query = ProductQuery::from(query.into_inner());

    let products = web::block(move || state.catalog.search_products(&query))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<ProductResponse> = products.iter().map(ProductResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /products/{id}
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(
        ("id" = String, Path, description = "Product id"),
    ),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "catalog"
)]
pub async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let product = web::block(move || state.catalog.get_product(&id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ProductResponse::from(&product)))
}

/// GET /categories
#[utoipa::path(
    get,
    path = "/categories",
    responses(
        (status = 200, description = "Product categories by name", body = [CategoryResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "catalog"
)]
pub async fn list_categories(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let categories = web::block(move || state.catalog.list_categories())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<CategoryResponse> = categories.into_iter().map(CategoryResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}
