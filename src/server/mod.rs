//! HTTP server layer for Microfibre.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │        POST /v1/post · POST /v1/update · GET /v1/posts          │
//! │                                                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────────┐  │
//! │  │  handlers   │  │    auth     │  │        routes           │  │
//! │  │ (requests)  │  │ (token gate)│  │  (router config)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod handlers;
pub mod routes;

pub use auth::{auth_middleware, AuthError, TokenAuth, AUTH_HEADER};
pub use handlers::{
    accepts_html, create_post_handler, default_handler, list_posts_handler, status_handler,
    update_post_handler, AppState, FailureResponse, PostIdResponse, PostsResponse,
    StatusResponse, TOTAL_COUNT_HEADER,
};
pub use routes::{create_dev_router, create_router, RouterConfig};
