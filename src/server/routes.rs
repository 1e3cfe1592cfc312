//! Router configuration for the Microfibre API.
//!
//! # Route Structure
//!
//! ```text
//! POST /v1/post      - Create a post (protected)
//! POST /v1/update    - Update a post (protected)
//! GET  /v1/posts     - List posts (protected)
//! *    /status       - Liveness check (public)
//! GET  /*            - Landing responder (public fallback)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use microfibre::posts::PostService;
//! use microfibre::server::routes::{create_router, RouterConfig};
//! use microfibre::store::SqlitePostStore;
//!
//! let store = SqlitePostStore::connect("sqlite://microfibre.db", 5).await?;
//! let router = create_router(PostService::new(store), RouterConfig::new("my-token"));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8787").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{
    middleware,
    routing::{any, get, post},
    Router,
};
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderName, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::{auth_middleware, TokenAuth, AUTH_HEADER};
use super::handlers::{
    create_post_handler, default_handler, list_posts_handler, status_handler,
    update_post_handler, AppState,
};
use crate::posts::PostService;
use crate::store::PostStore;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone)]
pub struct RouterConfig {
    /// Shared token expected in `x-auth-token`
    pub auth_token: String,

    /// Whether the `/v1` routes require the token
    pub auth_enabled: bool,

    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a new router configuration with the given auth token.
    ///
    /// By default authentication and tracing are enabled and CORS allows any
    /// origin.
    pub fn new(auth_token: impl Into<String>) -> Self {
        Self {
            auth_token: auth_token.into(),
            auth_enabled: true,
            cors_origins: None,
            enable_tracing: true,
        }
    }

    /// Create a configuration with authentication disabled.
    ///
    /// **Warning**: This should only be used for development/testing.
    pub fn without_auth() -> Self {
        Self {
            auth_token: String::new(),
            auth_enabled: false,
            cors_origins: None,
            enable_tracing: true,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// This function builds the complete Axum router with:
/// - Post routes under `/v1`, behind the token gate when auth is enabled
/// - The public `/status` route and the landing fallback
/// - CORS configuration
/// - Request tracing (optional)
pub fn create_router<S>(posts: PostService<S>, config: RouterConfig) -> Router
where
    S: PostStore + 'static,
{
    let app_state = AppState::new(posts);

    let api_routes = Router::new()
        .route("/v1/post", post(create_post_handler::<S>))
        .route("/v1/update", post(update_post_handler::<S>))
        .route("/v1/posts", get(list_posts_handler::<S>))
        .with_state(app_state);

    // route_layer so unmatched paths reach the fallback instead of the gate
    let api_routes = if config.auth_enabled {
        api_routes.route_layer(middleware::from_fn_with_state(
            TokenAuth::new(&config.auth_token),
            auth_middleware,
        ))
    } else {
        api_routes
    };

    let router = Router::new()
        .merge(api_routes)
        .route("/status", any(status_handler))
        .fallback(default_handler)
        .layer(build_cors_layer(&config));

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            ACCEPT,
            CONTENT_TYPE,
            HeaderName::from_static(AUTH_HEADER),
        ])
        .max_age(Duration::from_secs(86400));

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

/// Create a development router with authentication disabled.
///
/// **Warning**: This should only be used for local development and testing.
pub fn create_dev_router<S>(posts: PostService<S>) -> Router
where
    S: PostStore + 'static,
{
    create_router(posts, RouterConfig::without_auth())
}

// =============================================================================
// Tests
// =============================================================================
