//! ishi-board/crates/ib-api/src/middleware.rs Middleware
//!
//! Request logging and CORS for the JSON API.

use actix_web::middleware::Logger;
use actix_cors::Cors;

// Returns a standard set of middleware for the Ishi-Board API.
pub fn standard_middleware() -> Logger {
    // We use the 'default' logger which outputs:
    // remote-ip "request-line" status-code response-size "referrer" "user-agent"
    Logger::default()
}

// Configures CORS (Cross-Origin Resource Sharing)
// The feed page is served per-stone from isi<N> subdomains while the API
// may live elsewhere, so cross-origin requests are the normal case.
pub fn cors_policy() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "DELETE"])
        .allow_any_header()
        .max_age(3600)
}
