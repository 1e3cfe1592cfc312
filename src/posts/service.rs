//! Post service: validation, timestamps and partial-update merging on top of
//! a `PostStore`.

use chrono::Utc;
use tracing::{debug, info};

use crate::error::PostError;
use crate::store::{NewPost, PageWindow, Post, PostChanges, PostStore};

use super::request::{CreatePost, ListPostsQuery, PageLimits, UpdatePost, MISSING_BODY};

/// One page of the feed.
#[derive(Debug, Clone)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub page: i64,
    pub page_size: i64,
    /// Number of posts in the whole store
    pub total: i64,
}

/// Coordinates post operations against a store.
pub struct PostService<S: PostStore> {
    store: S,
    limits: PageLimits,
}

impl<S: PostStore> PostService<S> {
    /// Create a service with the default page limits.
    pub fn new(store: S) -> Self {
        Self::with_page_limits(store, PageLimits::default())
    }

    /// Create a service with custom page limits.
    pub fn with_page_limits(store: S, limits: PageLimits) -> Self {
        Self { store, limits }
    }

    /// Get the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a post and return its id.
    ///
    /// `created_time` is always assigned here, never taken from the client.
    pub async fn create_post(&self, request: CreatePost) -> Result<i64, PostError> {
        let body = request.body.ok_or_else(|| PostError::validation(MISSING_BODY))?;

        let post_id = self
            .store
            .insert_post(NewPost {
                body,
                location: request.location,
                created_timezone: request.created_timezone,
                created_time: now_millis(),
                media: request.media,
            })
            .await?;

        info!(post_id, "Post created");
        Ok(post_id)
    }

    /// Fetch one page of posts, newest first.
    pub async fn list_posts(&self, query: &ListPostsQuery) -> Result<PostPage, PostError> {
        let (page, page_size) = self.limits.resolve(query);

        let posts = self
            .store
            .list_posts(PageWindow::for_page(page, page_size))
            .await?;
        let total = self.store.count_posts().await?;

        debug!(page, page_size, returned = posts.len(), total, "Listed posts");
        Ok(PostPage {
            posts,
            page,
            page_size,
            total,
        })
    }

    /// Apply a partial update and return the post id.
    pub async fn update_post(&self, request: UpdatePost) -> Result<i64, PostError> {
        let (post_id, timezone) = request.required_fields()?;

        let existing = self
            .store
            .get_post(post_id)
            .await?
            .ok_or(PostError::NotFound { post_id })?;

        let changes = merge_changes(&existing, &request, timezone, now_millis());
        if !self.store.update_post(post_id, changes).await? {
            return Err(PostError::NotFound { post_id });
        }

        info!(post_id, "Post updated");
        Ok(post_id)
    }
}

/// Resolve the column values an update writes.
///
/// Absent fields keep the stored value. `updated_time` never precedes
/// `created_time`.
fn merge_changes(existing: &Post, request: &UpdatePost, timezone: &str, now: i64) -> PostChanges {
    PostChanges {
        body: request
            .body
            .clone()
            .unwrap_or_else(|| existing.body.clone()),
        location: match &request.location {
            Some(location) => location.clone(),
            None => existing.location.clone(),
        },
        updated_timezone: timezone.to_string(),
        updated_time: now.max(existing.created_time),
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

// =============================================================================
// Tests
// =============================================================================
