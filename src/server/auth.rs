//! Shared-secret token authentication.
//!
//! Protected routes require the `x-auth-token` header to carry the configured
//! token. Requests without it, or with any other value, are rejected with
//! `403 Forbidden` before the handler runs or the payload is read.
//!
//! ```text
//! POST /v1/post
//! x-auth-token: <token>
//! ```
//!
//! # Example
//!
//! ```rust
//! use microfibre::server::auth::TokenAuth;
//!
//! let auth = TokenAuth::new("my-token");
//! assert!(auth.verify(Some("my-token")).is_ok());
//! assert!(auth.verify(Some("other")).is_err());
//! assert!(auth.verify(None).is_err());
//! ```

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

/// Header carrying the shared token.
pub const AUTH_HEADER: &str = "x-auth-token";

/// Body of every rejected request.
pub const UNAUTHENTICATED_MESSAGE: &str =
    "Unauthenticated! Make sure you are providing the valid auth token!";

// =============================================================================
// Types
// =============================================================================

/// Authentication error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The token header is absent or not valid UTF-8
    MissingToken,

    /// The token does not match
    InvalidToken,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "Missing {} header", AUTH_HEADER),
            AuthError::InvalidToken => write!(f, "Invalid auth token"),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::InvalidToken => warn!(status = 403, "Authentication failed: {}", self),
            AuthError::MissingToken => debug!(status = 403, "Authentication failed: {}", self),
        }

        (
            StatusCode::FORBIDDEN,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            UNAUTHENTICATED_MESSAGE,
        )
            .into_response()
    }
}

// =============================================================================
// Token Authentication
// =============================================================================

/// Shared-secret token checker.
#[derive(Clone)]
pub struct TokenAuth {
    token: Vec<u8>,
}

impl TokenAuth {
    /// Create a checker accepting exactly `token`.
    pub fn new(token: impl AsRef<[u8]>) -> Self {
        Self {
            token: token.as_ref().to_vec(),
        }
    }

    /// Check a presented token value.
    pub fn verify(&self, presented: Option<&str>) -> Result<(), AuthError> {
        let presented = presented.ok_or(AuthError::MissingToken)?;

        // Length mismatch compares unequal without an early return on content
        if presented.as_bytes().ct_eq(&self.token).into() {
            Ok(())
        } else {
            Err(AuthError::InvalidToken)
        }
    }
}

// =============================================================================
// Axum Middleware
// =============================================================================

/// Axum middleware guarding routes with [`TokenAuth`].
///
/// # Example
///
/// ```ignore
/// use axum::{Router, middleware, routing::post};
/// use microfibre::server::auth::{TokenAuth, auth_middleware};
///
/// let auth = TokenAuth::new("my-token");
/// let app = Router::new()
///     .route("/v1/post", post(handler))
///     .route_layer(middleware::from_fn_with_state(auth, auth_middleware));
/// ```
pub async fn auth_middleware(
    State(auth): State<TokenAuth>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let presented = request
        .headers()
        .get(AUTH_HEADER)
        .and_then(|value| value.to_str().ok());

    auth.verify(presented)?;

    Ok(next.run(request).await)
}

// =============================================================================
// Tests
// =============================================================================
