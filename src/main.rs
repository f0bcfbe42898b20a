use actix_web::web;
use dotenvy::dotenv;
use storefront::{build_server, create_pool, run_migrations, seed_catalog, AppState, Config};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env()
        .inspect_err(|e| log::error!("Invalid configuration: {}", e))?;

    let pool = create_pool(&config.database_url)?;
    run_migrations(&pool)?;

    if let Some(path) = &config.catalog_seed_path {
        let inserted = seed_catalog(&pool, path)?;
        log::info!("Seeded {} products from {}", inserted, path.display());
    }

    let state = web::Data::new(AppState::new(pool, &config));

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(state, &config.host, config.port)?.await?;
    Ok(())
}
