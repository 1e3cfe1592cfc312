//! Post operations: create, list and partial update.
//!
//! The service validates payloads, assigns server-side timestamps and
//! resolves pagination before delegating to a [`PostStore`](crate::store::PostStore).

mod request;
mod service;

pub use request::{
    CreatePost, ListPostsQuery, PageLimits, UpdatePost, DEFAULT_MAX_PAGE_SIZE, DEFAULT_PAGE_SIZE,
    MISSING_BODY, MISSING_UPDATE_FIELDS,
};
pub use service::{PostPage, PostService};
