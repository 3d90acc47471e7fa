//! # Domain Models
//!
//! These structs represent the core entities of Ishi-Board.
//! Field names serialize in camelCase because the frontend consumes
//! these structs directly as JSON.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// A single physical stone and its bulletin board.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stone {
    /// Identifier of the form `stone-NNN`, derived from the request host.
    /// Sole primary key; stones are created lazily and only removed by
    /// the bulk-clear maintenance path.
    pub id: String,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// One immutable feed entry belonging to exactly one stone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Store-assigned, monotonically increasing.
    pub id: i64,
    pub stone_id: String,
    pub nickname: String,
    pub comment: String,
    pub post_location_lat: Option<f64>,
    pub post_location_lng: Option<f64>,
    pub user_id: Option<String>,
    /// `#` + 6 hex digits when present. Cosmetic grouping aid only.
    pub pin_color: Option<String>,
    /// Assigned by the store at insert time; the feed's ordering key.
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a post. The store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub stone_id: String,
    pub nickname: String,
    pub comment: String,
    pub post_location_lat: Option<f64>,
    pub post_location_lng: Option<f64>,
    pub user_id: Option<String>,
    pub pin_color: Option<String>,
}

/// Wire shape for an optional coordinate pair on incoming requests.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}
