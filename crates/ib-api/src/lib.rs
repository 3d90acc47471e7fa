//! # ib-api
//!
//! The web routing and orchestration layer for Ishi-Board.

pub mod handlers;
pub mod middleware;

use actix_web::web;

/// Configures the routes for the stone boards.
///
/// # Developer Note
/// We use a scoped configuration to allow the main binary to mount
/// the API under different paths if needed (e.g., /api/v1/).
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index)).service(
        web::scope("/api")
            // The per-stone feed (stone derived from the request host)
            .route("/posts", web::get().to(handlers::list_posts))
            .route("/posts", web::post().to(handlers::create_post))
            // Maintenance / diagnostics
            .route("/debug/posts", web::get().to(handlers::debug_posts))
            .route("/debug/clear-all", web::delete().to(handlers::clear_all))
            // Frontend config passthrough
            .route("/google-maps-config", web::get().to(handlers::maps_config)),
    );
}
