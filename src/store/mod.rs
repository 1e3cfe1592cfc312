//! Persistence layer for posts and their media.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              PostService                │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │            PostStore Trait              │
//! │   (parameterized statements, joins)     │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │           SqlitePostStore               │
//! │      (sqlx pool, posts + media)         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use microfibre::store::{NewPost, PostStore, SqlitePostStore};
//!
//! let store = SqlitePostStore::connect("sqlite://microfibre.db", 5).await?;
//! let post_id = store.insert_post(NewPost {
//!     body: "hello".to_string(),
//!     location: None,
//!     created_timezone: Some("UTC".to_string()),
//!     created_time: 1_700_000_000_000,
//!     media: vec![],
//! }).await?;
//! ```

mod models;
mod post_store;
mod sqlite;

pub use models::{Media, NewMedia, NewPost, PageWindow, Post, PostChanges};
pub use post_store::PostStore;
pub use sqlite::SqlitePostStore;
