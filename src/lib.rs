//! # Microfibre
//!
//! A small personal micro-blogging API: posts with optional location and
//! media, stored in SQLite, served over HTTP behind a shared-token gate.
//!
//! ## Features
//!
//! - **Post API**: create, partially update and page through posts
//! - **Media join**: each listed post carries its media rows
//! - **Token gate**: `x-auth-token` header check on the `/v1` routes
//! - **Content negotiation**: `/status` and the landing page answer in HTML or JSON
//!
//! ## Architecture
//!
//! - [`store`] - `PostStore` trait and the SQLite implementation
//! - [`posts`] - Post service: validation, timestamps, pagination
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use microfibre::{create_router, PostService, RouterConfig, SqlitePostStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SqlitePostStore::connect("sqlite://microfibre.db", 5).await?;
//!     let router = create_router(PostService::new(store), RouterConfig::new("my-token"));
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8787").await?;
//!     axum::serve(listener, router).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod posts;
pub mod server;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use error::{PostError, StoreError};
pub use posts::{CreatePost, ListPostsQuery, PageLimits, PostPage, PostService, UpdatePost};
pub use server::{
    auth_middleware, create_dev_router, create_router, AppState, AuthError, FailureResponse,
    PostIdResponse, PostsResponse, RouterConfig, StatusResponse, TokenAuth, AUTH_HEADER,
    TOTAL_COUNT_HEADER,
};
pub use store::{Media, NewMedia, NewPost, PageWindow, Post, PostChanges, PostStore, SqlitePostStore};
