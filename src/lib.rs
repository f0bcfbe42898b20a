pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;
pub mod state;

#[cfg(test)]
mod test_support;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::Config;
pub use db::{create_pool, DbPool};
pub use infrastructure::seed::seed_catalog;
pub use state::AppState;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    log::info!("Applied {} pending migrations", applied.len());
    Ok(())
}

/// Register every API route. Shared by the server and handler tests.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .route("", web::get().to(handlers::products::list_products))
            .route("/{id}", web::get().to(handlers::products::get_product)),
    )
    .route(
        "/categories",
        web::get().to(handlers::products::list_categories),
    )
    .service(
        web::scope("/cart")
            .route("", web::get().to(handlers::cart::get_cart))
            .route("", web::delete().to(handlers::cart::clear_cart))
            .route("/items", web::post().to(handlers::cart::add_item))
            .route(
                "/items/{product_id}",
                web::put().to(handlers::cart::set_quantity),
            )
            .route(
                "/items/{product_id}",
                web::delete().to(handlers::cart::remove_item),
            )
            .route("/panel", web::put().to(handlers::cart::set_panel)),
    )
    .service(
        web::scope("/checkout")
            .route("", web::post().to(handlers::checkout::create_checkout))
            .route("/totals", web::get().to(handlers::checkout::get_totals))
            .route("/prefill", web::get().to(handlers::checkout::get_prefill)),
    )
    .route(
        "/payment/success",
        web::get().to(handlers::checkout::payment_success),
    )
    .service(
        web::scope("/orders")
            .route("", web::get().to(handlers::orders::list_orders))
            .route("/{id}", web::delete().to(handlers::orders::delete_order)),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: web::Data<AppState>,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let openapi = handlers::ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            .configure(configure_routes)
    })
    .bind((host.to_string(), port))?
    .run())
}
