//! # Ishi-Board Binary
//!
//! The entry point that assembles the application based on compile-time features.

mod config;

use actix_web::{web, App, HttpServer};
use ib_api::handlers::{AppState, MapsConfig};
use ib_api::middleware;
use ib_core::color::{ClientSuppliedStrategy, ColorStrategy, RotationStrategy};

use config::{ColorPolicy, ServerConfig};

// Feature-gated imports: This is the "Compiled-to-Order" magic
#[cfg(feature = "db-sqlite")]
use ib_db_sqlite::SqliteStoneStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();

    // 1. Initialize Database Implementation.
    //    A dead pool here is a process-wide fatal condition, not a
    //    per-request error.
    #[cfg(feature = "db-sqlite")]
    let store = SqliteStoneStore::new(&config.database_url)
        .await
        .expect("Failed to init SQLite");

    // 2. Select the pin-color strategy from configuration
    let colors: Box<dyn ColorStrategy> = match config.color_policy {
        ColorPolicy::Rotation => Box::new(RotationStrategy::new(config.palette.clone())),
        ColorPolicy::ClientSupplied => Box::new(ClientSuppliedStrategy),
    };

    // 3. Wrap in AppState (Using dynamic dispatch for maximum flexibility)
    let state = web::Data::new(AppState {
        store: Box::new(store),
        colors,
        maps: MapsConfig {
            api_key: config.maps_api_key.clone(),
            map_id: config.maps_map_id.clone(),
        },
    });

    log::info!("🪨 Ishi-Board starting on http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::standard_middleware())
            .wrap(middleware::cors_policy())
            .configure(ib_api::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
