//! Process configuration, read once at startup from the environment.
//! Missing or malformed values fall back to defaults with a warning;
//! nothing here takes the process down.

use ib_core::color::{is_hex_color, DEFAULT_PALETTE};
use std::env;

/// Which pin-color generation is active. The two are never mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorPolicy {
    Rotation,
    ClientSupplied,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub color_policy: ColorPolicy,
    pub palette: [String; 4],
    pub maps_api_key: String,
    pub maps_map_id: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: env_or("HOST", "127.0.0.1"),
            port: env_or("PORT", "8080").parse().unwrap_or_else(|_| {
                log::warn!("invalid PORT value, using 8080");
                8080
            }),
            database_url: env_or("DATABASE_URL", "sqlite:ishi_board.db"),
            color_policy: match env_or("PIN_COLOR_POLICY", "rotation").as_str() {
                "rotation" => ColorPolicy::Rotation,
                "client" => ColorPolicy::ClientSupplied,
                other => {
                    log::warn!("unknown PIN_COLOR_POLICY '{other}', using rotation");
                    ColorPolicy::Rotation
                }
            },
            palette: palette_from_env(),
            maps_api_key: env_or("GOOGLE_MAPS_API_KEY", ""),
            maps_map_id: env_or("GOOGLE_MAPS_MAP_ID", ""),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// PIN_PALETTE takes exactly 4 comma-separated `#rrggbb` colors.
fn palette_from_env() -> [String; 4] {
    let default = DEFAULT_PALETTE.map(str::to_string);
    let raw = match env::var("PIN_PALETTE") {
        Ok(raw) => raw,
        Err(_) => return default,
    };

    let colors: Vec<String> = raw.split(',').map(|c| c.trim().to_string()).collect();
    match <[String; 4]>::try_from(colors) {
        Ok(palette) if palette.iter().all(|c| is_hex_color(c)) => palette,
        _ => {
            log::warn!("PIN_PALETTE must list exactly 4 hex colors, using defaults");
            default
        }
    }
}
