use async_trait::async_trait;

use crate::error::StoreError;

use super::models::{NewPost, PageWindow, Post, PostChanges};

/// Storage contract for posts and their media.
///
/// Implementations must run [`insert_post`](PostStore::insert_post)'s insert,
/// its last-insert id lookup and the media inserts on one connection inside
/// one transaction, so the returned id is always the id of the row this call
/// inserted even when the backend is pooled.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Insert a post (and its media) and return the store-assigned id.
    async fn insert_post(&self, post: NewPost) -> Result<i64, StoreError>;

    /// Fetch a single post with its media.
    async fn get_post(&self, id: i64) -> Result<Option<Post>, StoreError>;

    /// Fetch a window of posts ordered by id descending, each with its media.
    async fn list_posts(&self, window: PageWindow) -> Result<Vec<Post>, StoreError>;

    /// Total number of stored posts.
    async fn count_posts(&self) -> Result<i64, StoreError>;

    /// Overwrite the mutable columns of a post.
    ///
    /// Returns `false` if no row has the given id.
    async fn update_post(&self, id: i64, changes: PostChanges) -> Result<bool, StoreError>;
}
