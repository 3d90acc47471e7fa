//! # Core Traits (Ports)
//!
//! Any storage plugin must implement these traits to be used by the binary.

use async_trait::async_trait;
use crate::error::Result;
use crate::models::{NewPost, Post, Stone};

/// Data persistence contract for stones and their post feeds.
///
/// Posts are append-only: nothing here mutates or deletes a single row.
/// The only destructive operation is the bulk maintenance wipe.
#[async_trait]
pub trait StoneStore: Send + Sync {
    /// Insert-or-get a stone row. Idempotent and safe under concurrent
    /// calls for the same id; an existing row keeps its location fields.
    async fn ensure_stone(&self, id: &str) -> Result<Stone>;

    /// Append an immutable post row and return it as stored (with the
    /// assigned id and timestamp). The stone must already exist; this
    /// never auto-creates, callers go through `ensure_stone` first.
    async fn append_post(&self, new: NewPost) -> Result<Post>;

    /// The complete feed for one stone, newest first
    /// (created_at desc, id desc).
    async fn list_posts(&self, stone_id: &str) -> Result<Vec<Post>>;

    /// The row `list_posts(stone_id)` would yield first, or None for an
    /// empty feed. Single-row fetch, same ordering.
    async fn latest_post(&self, stone_id: &str) -> Result<Option<Post>>;

    /// Newest `limit` posts across all stones; backs the debug listing.
    async fn recent_posts(&self, limit: i64) -> Result<Vec<Post>>;

    /// Maintenance wipe: all posts, then all stones (referential order).
    /// Returns (deleted_posts, deleted_stones).
    async fn clear_all(&self) -> Result<(u64, u64)>;
}
