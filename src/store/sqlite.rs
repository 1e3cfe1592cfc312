//! SQLite-backed implementation of `PostStore`.
//!
//! All statements are parameterized. The schema is bootstrapped with
//! `CREATE TABLE IF NOT EXISTS` when the store is opened; there is no
//! versioned migration step.

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite};
use tracing::debug;

use crate::error::StoreError;

use super::models::{Media, NewPost, PageWindow, Post, PostChanges};
use super::PostStore;

const CREATE_POSTS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS posts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        body TEXT NOT NULL,
        location TEXT,
        created_timezone TEXT,
        created_time INTEGER NOT NULL,
        updated_timezone TEXT,
        updated_time INTEGER
    )";

const CREATE_MEDIA_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS media (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        post_id INTEGER NOT NULL REFERENCES posts (id),
        url TEXT NOT NULL,
        type TEXT NOT NULL,
        title TEXT
    )";

const POST_COLUMNS: &str =
    "id, body, location, created_timezone, created_time, updated_timezone, updated_time";

/// SQLite store holding a connection pool.
#[derive(Clone)]
pub struct SqlitePostStore {
    pool: SqlitePool,
}

impl SqlitePostStore {
    /// Open (creating the database file if needed) and bootstrap the schema.
    ///
    /// # Arguments
    /// * `database_url` - sqlx SQLite URL, e.g. `sqlite://microfibre.db`
    /// * `max_connections` - upper bound on pooled connections
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    /// Open a private in-memory database.
    ///
    /// The pool is pinned to a single connection that never expires, since
    /// every SQLite in-memory connection is its own database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool and bootstrap the schema on it.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Get the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_POSTS_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_MEDIA_TABLE).execute(&self.pool).await?;
        debug!("Schema ready");
        Ok(())
    }

    /// Fetch the media of several posts with one query, grouped by post id.
    async fn media_for_posts(&self, post_ids: &[i64]) -> Result<HashMap<i64, Vec<Media>>, StoreError> {
        let mut grouped: HashMap<i64, Vec<Media>> = HashMap::new();
        if post_ids.is_empty() {
            return Ok(grouped);
        }

        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT id, post_id, url, type, title FROM media WHERE post_id IN (",
        );
        let mut ids = query.separated(", ");
        for id in post_ids {
            ids.push_bind(*id);
        }
        ids.push_unseparated(") ORDER BY id ASC");

        let rows = query.build().fetch_all(&self.pool).await?;
        for row in rows {
            let media = media_from_row(&row)?;
            grouped.entry(media.post_id).or_default().push(media);
        }

        Ok(grouped)
    }
}

fn post_from_row(row: &SqliteRow) -> Result<Post, sqlx::Error> {
    Ok(Post {
        id: row.try_get("id")?,
        body: row.try_get("body")?,
        location: row.try_get("location")?,
        created_timezone: row.try_get("created_timezone")?,
        created_time: row.try_get("created_time")?,
        updated_timezone: row.try_get("updated_timezone")?,
        updated_time: row.try_get("updated_time")?,
        media: Vec::new(),
    })
}

fn media_from_row(row: &SqliteRow) -> Result<Media, sqlx::Error> {
    Ok(Media {
        id: row.try_get("id")?,
        post_id: row.try_get("post_id")?,
        url: row.try_get("url")?,
        kind: row.try_get("type")?,
        title: row.try_get("title")?,
    })
}

#[async_trait]
impl PostStore for SqlitePostStore {
    async fn insert_post(&self, post: NewPost) -> Result<i64, StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO posts (body, location, created_timezone, created_time) \
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&post.body)
        .bind(&post.location)
        .bind(&post.created_timezone)
        .bind(post.created_time)
        .execute(&mut *tx)
        .await?;

        // Same connection as the insert above
        let post_id: i64 = sqlx::query_scalar("SELECT last_insert_rowid()")
            .fetch_one(&mut *tx)
            .await?;

        for media in &post.media {
            sqlx::query("INSERT INTO media (post_id, url, type, title) VALUES (?1, ?2, ?3, ?4)")
                .bind(post_id)
                .bind(&media.url)
                .bind(&media.kind)
                .bind(&media.title)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(post_id)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, StoreError> {
        let row = sqlx::query(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let mut post = match row {
            Some(row) => post_from_row(&row)?,
            None => return Ok(None),
        };

        let mut media = self.media_for_posts(&[id]).await?;
        post.media = media.remove(&id).unwrap_or_default();
        Ok(Some(post))
    }

    async fn list_posts(&self, window: PageWindow) -> Result<Vec<Post>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY id DESC LIMIT ?1 OFFSET ?2"
        ))
        .bind(window.limit)
        .bind(window.offset)
        .fetch_all(&self.pool)
        .await?;

        let mut posts = rows
            .iter()
            .map(post_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        let ids: Vec<i64> = posts.iter().map(|post| post.id).collect();
        let mut media = self.media_for_posts(&ids).await?;
        for post in &mut posts {
            post.media = media.remove(&post.id).unwrap_or_default();
        }

        Ok(posts)
    }

    async fn count_posts(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn update_post(&self, id: i64, changes: PostChanges) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE posts SET body = ?1, location = ?2, updated_timezone = ?3, updated_time = ?4 \
             WHERE id = ?5",
        )
        .bind(&changes.body)
        .bind(&changes.location)
        .bind(&changes.updated_timezone)
        .bind(changes.updated_time)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
