//! HTTP request handlers for the Microfibre API.
//!
//! # Endpoints
//!
//! - `POST /v1/post` - Create a post
//! - `POST /v1/update` - Partially update a post
//! - `GET /v1/posts` - List posts, newest first, with media
//! - `* /status` - Liveness check
//! - `GET /` (and any other path) - Default landing responder

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::error::{PostError, StoreError};
use crate::posts::{CreatePost, ListPostsQuery, PostService, UpdatePost};
use crate::store::{Post, PostStore};

/// Response header carrying the total number of posts.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

const STATUS_HTML: &str = "We're up! 🆙";

const LANDING_HTML: &str = "<html><head><title>Microfibre v1 API</title></head>\
<body><marquee>Hello World!</marquee></body></html>";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the post service.
///
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<S: PostStore> {
    pub posts: Arc<PostService<S>>,
}

impl<S: PostStore> AppState<S> {
    /// Create a new application state with the given post service.
    pub fn new(posts: PostService<S>) -> Self {
        Self {
            posts: Arc::new(posts),
        }
    }
}

impl<S: PostStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            posts: Arc::clone(&self.posts),
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

const SUCCESS: &str = "success";
const FAILURE: &str = "failure";

/// `{"status":"failure","error":...}` envelope returned for all errors.
#[derive(Debug, Serialize)]
pub struct FailureResponse {
    pub status: &'static str,
    pub error: String,
}

impl FailureResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            status: FAILURE,
            error: error.into(),
        }
    }
}

/// Response of the create and update endpoints.
#[derive(Debug, Serialize)]
pub struct PostIdResponse {
    pub status: &'static str,
    #[serde(rename = "postId")]
    pub post_id: i64,
}

impl PostIdResponse {
    pub fn new(post_id: i64) -> Self {
        Self {
            status: SUCCESS,
            post_id,
        }
    }
}

/// Response of the list endpoint.
#[derive(Debug, Serialize)]
pub struct PostsResponse {
    pub status: &'static str,
    pub posts: Vec<Post>,
}

/// Liveness response for non-HTML clients.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn up() -> Self {
        Self { status: "up" }
    }
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert PostError to HTTP response.
///
/// - 5xx errors are logged at ERROR level
/// - 404s at DEBUG, other 4xx at WARN
impl IntoResponse for PostError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            PostError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            PostError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            PostError::Store(StoreError::Unavailable(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "store_unavailable")
            }
            PostError::Store(StoreError::Database(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "store_error")
            }
        };
        let message = self.to_string();

        if status.is_server_error() {
            error!(
                error_type = error_type,
                status = status.as_u16(),
                "Server error: {}",
                message
            );
        } else if let PostError::NotFound { post_id } = &self {
            debug!(
                error_type = error_type,
                status = status.as_u16(),
                post_id = *post_id,
                "Post not found"
            );
        } else {
            warn!(
                error_type = error_type,
                status = status.as_u16(),
                "Client error: {}",
                message
            );
        }

        (status, Json(FailureResponse::new(message))).into_response()
    }
}

/// Parse a JSON request body regardless of its `Content-Type`.
fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, PostError> {
    serde_json::from_slice(body)
        .map_err(|e| PostError::validation(format!("Invalid JSON payload: {}", e)))
}

// =============================================================================
// Handlers
// =============================================================================

/// Create a post.
///
/// # Endpoint
///
/// `POST /v1/post` (requires `x-auth-token`)
///
/// # Body
///
/// ```json
/// {"body": "hello", "location": "Lisbon", "created_timezone": "UTC",
///  "media": [{"url": "https://...", "type": "image", "title": "..."}]}
/// ```
///
/// # Response
///
/// `200 OK` with `{"status":"success","postId":1}`.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed JSON or missing `body`
/// - `500 Internal Server Error`: Store failure
pub async fn create_post_handler<S: PostStore>(
    State(state): State<AppState<S>>,
    body: Bytes,
) -> Result<Json<PostIdResponse>, PostError> {
    let request: CreatePost = parse_json(&body)?;
    let post_id = state.posts.create_post(request).await?;
    Ok(Json(PostIdResponse::new(post_id)))
}

/// List posts, newest first.
///
/// # Endpoint
///
/// `GET /v1/posts?page=0&pageSize=10` (requires `x-auth-token`)
///
/// # Response
///
/// `200 OK` with `{"status":"success","posts":[...]}`; each post carries a
/// `media` array. The `X-Total-Count` header holds the total number of posts.
///
/// # Errors
///
/// - `500 Internal Server Error`: Store failure
pub async fn list_posts_handler<S: PostStore>(
    State(state): State<AppState<S>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, PostError> {
    let query = ListPostsQuery::from_pairs(pairs);
    let page = state.posts.list_posts(&query).await?;

    let mut response = Json(PostsResponse {
        status: SUCCESS,
        posts: page.posts,
    })
    .into_response();
    response
        .headers_mut()
        .insert(TOTAL_COUNT_HEADER, HeaderValue::from(page.total));

    Ok(response)
}

/// Partially update a post.
///
/// # Endpoint
///
/// `POST /v1/update` (requires `x-auth-token`)
///
/// # Body
///
/// `postId` and `updated_timezone` are required. `body` and `location`
/// overwrite the stored values only when present; `"location": null` clears
/// the location.
///
/// # Response
///
/// `200 OK` with `{"status":"success","postId":1}`.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed JSON, missing `postId` or `updated_timezone`
/// - `404 Not Found`: No post with that id
/// - `500 Internal Server Error`: Store failure
pub async fn update_post_handler<S: PostStore>(
    State(state): State<AppState<S>>,
    body: Bytes,
) -> Result<Json<PostIdResponse>, PostError> {
    let request: UpdatePost = parse_json(&body)?;
    let post_id = state.posts.update_post(request).await?;
    Ok(Json(PostIdResponse::new(post_id)))
}

/// Liveness check for any method.
///
/// Returns an HTML fragment when the client accepts `text/html`, otherwise
/// `{"status":"up"}`. Always `200 OK`.
pub async fn status_handler(headers: HeaderMap) -> Response {
    if accepts_html(&headers) {
        Html(STATUS_HTML).into_response()
    } else {
        Json(StatusResponse::up()).into_response()
    }
}

/// Fallback for paths no route matches.
///
/// `GET`/`HEAD` get the landing page (HTML or JSON per `Accept`); any other
/// method gets `404` with the failure envelope.
pub async fn default_handler(method: Method, headers: HeaderMap) -> Response {
    if method != Method::GET && method != Method::HEAD {
        debug!(%method, "No route for request");
        return (StatusCode::NOT_FOUND, Json(FailureResponse::new("Not found"))).into_response();
    }

    if accepts_html(&headers) {
        Html(LANDING_HTML).into_response()
    } else {
        Json(StatusResponse::up()).into_response()
    }
}

/// Whether any `Accept` entry is exactly `text/html` (parameters ignored).
pub fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|entry| entry.split(';').next().unwrap_or("").trim())
        .any(|media_type| media_type.eq_ignore_ascii_case("text/html"))
}

// =============================================================================
// Tests
// =============================================================================
