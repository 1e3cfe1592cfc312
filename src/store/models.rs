//! Row types for the `posts` and `media` tables.

use serde::{Deserialize, Serialize};

/// A stored micro-blog entry, with its media attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub body: String,
    pub location: Option<String>,
    pub created_timezone: Option<String>,
    /// Epoch milliseconds, assigned by the server at insert
    pub created_time: i64,
    /// Null until the first update
    pub updated_timezone: Option<String>,
    /// Epoch milliseconds, null until the first update
    pub updated_time: Option<i64>,
    #[serde(default)]
    pub media: Vec<Media>,
}

/// A media row attached to exactly one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub id: i64,
    pub post_id: i64,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: Option<String>,
}

/// A post ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub body: String,
    pub location: Option<String>,
    pub created_timezone: Option<String>,
    pub created_time: i64,
    pub media: Vec<NewMedia>,
}

/// A media row to insert alongside a new post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMedia {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// The fully resolved column values written by an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostChanges {
    pub body: String,
    pub location: Option<String>,
    pub updated_timezone: String,
    pub updated_time: i64,
}

/// A LIMIT/OFFSET window over posts ordered newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: i64,
    pub offset: i64,
}

impl PageWindow {
    /// Window for a zero-based page of `page_size` posts.
    pub fn for_page(page: i64, page_size: i64) -> Self {
        Self {
            limit: page_size,
            offset: page.saturating_mul(page_size),
        }
    }
}
