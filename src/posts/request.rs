//! Request payloads for the post endpoints.
//!
//! Optional update fields are presence-aware: a key that is absent from the
//! payload is distinguished from a key that is present with an empty or null
//! value.

use serde::{Deserialize, Deserializer};

use crate::error::PostError;
use crate::store::NewMedia;

/// Default number of posts per page.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Default upper bound on the number of posts per page.
pub const DEFAULT_MAX_PAGE_SIZE: i64 = 100;

/// Message returned when an update lacks its required fields.
pub const MISSING_UPDATE_FIELDS: &str = "Missing `postId` or `updated_timezone` in the payload!";

/// Message returned when a new post lacks a body.
pub const MISSING_BODY: &str = "Missing `body` in the payload!";

// =============================================================================
// Create
// =============================================================================

/// Payload for `POST /v1/post`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePost {
    /// Post text; required, an empty string is accepted
    #[serde(default)]
    pub body: Option<String>,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub created_timezone: Option<String>,

    /// Media rows to attach to the new post
    #[serde(default)]
    pub media: Vec<NewMedia>,
}

// =============================================================================
// Update
// =============================================================================

/// Payload for `POST /v1/update`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePost {
    #[serde(default, rename = "postId")]
    pub post_id: Option<i64>,

    #[serde(default)]
    pub updated_timezone: Option<String>,

    /// `None` keeps the stored body; `null` is treated the same as absent
    #[serde(default)]
    pub body: Option<String>,

    /// `None` when absent (keep), `Some(None)` when null (clear),
    /// `Some(Some(_))` to overwrite
    #[serde(default, deserialize_with = "present")]
    pub location: Option<Option<String>>,
}

impl UpdatePost {
    /// Return the required `(postId, updated_timezone)` pair.
    ///
    /// A blank timezone counts as missing.
    pub fn required_fields(&self) -> Result<(i64, &str), PostError> {
        match (self.post_id, self.updated_timezone.as_deref()) {
            (Some(post_id), Some(timezone)) if !timezone.trim().is_empty() => {
                Ok((post_id, timezone))
            }
            _ => Err(PostError::validation(MISSING_UPDATE_FIELDS)),
        }
    }
}

/// Marks a field as present, keeping an explicit `null` as `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// =============================================================================
// List
// =============================================================================

/// Query string for `GET /v1/posts`.
///
/// Values are kept raw so that anything unparseable falls back to the
/// default instead of rejecting the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPostsQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl ListPostsQuery {
    /// Build from decoded query pairs. A repeated key keeps its first value;
    /// unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut query.page,
                "pageSize" => &mut query.page_size,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }
}

/// Page size bounds applied to list requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_size: i64,
    pub max_size: i64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_size: DEFAULT_PAGE_SIZE,
            max_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

impl PageLimits {
    /// Resolve a query into a zero-based `(page, page_size)` pair.
    ///
    /// - `page`: any integer ≥ 0 is used as-is (0 included); otherwise 0
    /// - `pageSize`: any integer ≥ 1 is used, capped at `max_size`;
    ///   otherwise `default_size`
    pub fn resolve(&self, query: &ListPostsQuery) -> (i64, i64) {
        let page = parse_int(query.page.as_deref())
            .filter(|page| *page >= 0)
            .unwrap_or(0);

        let page_size = parse_int(query.page_size.as_deref())
            .filter(|size| *size > 0)
            .map(|size| size.min(self.max_size))
            .unwrap_or(self.default_size);

        (page, page_size)
    }
}

fn parse_int(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse::<i64>().ok())
}

// =============================================================================
// Tests
// =============================================================================
