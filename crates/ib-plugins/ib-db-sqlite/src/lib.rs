//! # ib-db-sqlite Implementation
//!
//! This module implements the data mapping between the SQLite relational model
//! and the `ib-core` domain models.

use async_trait::async_trait;
use chrono::Utc;
use ib_core::error::{AppError, Result};
use ib_core::models::{NewPost, Post, Stone};
use ib_core::traits::StoneStore;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;

pub struct SqliteStoneStore {
    pool: SqlitePool,
}

fn storage(err: sqlx::Error) -> AppError {
    AppError::Storage(err.to_string())
}

fn row_to_stone(row: &SqliteRow) -> Stone {
    Stone {
        id: row.get("id"),
        location_lat: row.get("location_lat"),
        location_lng: row.get("location_lng"),
        created_at: row.get("created_at"),
    }
}

fn row_to_post(row: &SqliteRow) -> Post {
    Post {
        id: row.get("id"),
        stone_id: row.get("stone_id"),
        nickname: row.get("nickname"),
        comment: row.get("comment"),
        post_location_lat: row.get("post_location_lat"),
        post_location_lng: row.get("post_location_lng"),
        user_id: row.get("user_id"),
        pin_color: row.get("pin_color"),
        created_at: row.get("created_at"),
    }
}

impl SqliteStoneStore {
    /// Connects the pool and runs the idempotent schema setup.
    ///
    /// Fails only on connection or DDL errors; the binary treats that as
    /// fatal at startup.
    pub async fn new(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // A `:memory:` database exists per connection, so the pool must
        // stay at one connection to keep every query on the same database.
        let max_connections = if url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS stones (
                id           TEXT PRIMARY KEY,
                location_lat REAL,
                location_lng REAL,
                created_at   TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS posts (
                id                INTEGER PRIMARY KEY AUTOINCREMENT,
                stone_id          TEXT NOT NULL REFERENCES stones(id),
                nickname          TEXT NOT NULL,
                comment           TEXT NOT NULL DEFAULT '',
                post_location_lat REAL,
                post_location_lng REAL,
                user_id           TEXT,
                pin_color         TEXT,
                created_at        TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_posts_stone_id ON posts (stone_id)")
            .execute(&self.pool)
            .await?;

        log::debug!("sqlite schema ready");
        Ok(())
    }
}

#[async_trait]
impl StoneStore for SqliteStoneStore {
    /// Insert-or-get. The conflict clause is what makes two concurrent
    /// first requests for the same id safe, and it never touches an
    /// existing row's location fields.
    async fn ensure_stone(&self, id: &str) -> Result<Stone> {
        sqlx::query("INSERT INTO stones (id, created_at) VALUES (?, ?) ON CONFLICT(id) DO NOTHING")
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(storage)?;

        let row = sqlx::query("SELECT id, location_lat, location_lng, created_at FROM stones WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(storage)?;

        Ok(row_to_stone(&row))
    }

    async fn append_post(&self, new: NewPost) -> Result<Post> {
        if new.nickname.trim().is_empty() {
            return Err(AppError::Validation("nickname is required".to_string()));
        }

        // The store never auto-creates; callers provision via ensure_stone.
        let exists = sqlx::query("SELECT 1 FROM stones WHERE id = ?")
            .bind(&new.stone_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;
        if exists.is_none() {
            return Err(AppError::UnknownStone(new.stone_id));
        }

        let inserted = sqlx::query(
            "INSERT INTO posts (stone_id, nickname, comment, post_location_lat, post_location_lng, user_id, pin_color, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&new.stone_id)
        .bind(&new.nickname)
        .bind(&new.comment)
        .bind(new.post_location_lat)
        .bind(new.post_location_lng)
        .bind(&new.user_id)
        .bind(&new.pin_color)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        // Hand back exactly the stored row, assigned id and timestamp included.
        let row = sqlx::query("SELECT * FROM posts WHERE id = ?")
            .bind(inserted.last_insert_rowid())
            .fetch_one(&self.pool)
            .await
            .map_err(storage)?;

        Ok(row_to_post(&row))
    }

    async fn list_posts(&self, stone_id: &str) -> Result<Vec<Post>> {
        let rows = sqlx::query(
            "SELECT * FROM posts WHERE stone_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(stone_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        Ok(rows.iter().map(row_to_post).collect())
    }

    /// Single-row variant of `list_posts`; same ordering, so it always
    /// agrees with the head of the full feed.
    async fn latest_post(&self, stone_id: &str) -> Result<Option<Post>> {
        let row = sqlx::query(
            "SELECT * FROM posts WHERE stone_id = ? ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .bind(stone_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        Ok(row.as_ref().map(row_to_post))
    }

    async fn recent_posts(&self, limit: i64) -> Result<Vec<Post>> {
        let rows = sqlx::query("SELECT * FROM posts ORDER BY created_at DESC, id DESC LIMIT ?")
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;

        Ok(rows.iter().map(row_to_post).collect())
    }

    /// Posts reference stones, so they are deleted first. One transaction
    /// so a half-finished wipe never leaves orphaned rows behind.
    async fn clear_all(&self) -> Result<(u64, u64)> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let posts = sqlx::query("DELETE FROM posts")
            .execute(&mut *tx)
            .await
            .map_err(storage)?
            .rows_affected();

        let stones = sqlx::query("DELETE FROM stones")
            .execute(&mut *tx)
            .await
            .map_err(storage)?
            .rows_affected();

        tx.commit().await.map_err(storage)?;

        log::warn!("cleared all data: {posts} posts, {stones} stones");
        Ok((posts, stones))
    }
}
