//! Pagination utilities for Twitch API responses.

use serde::{Deserialize, Serialize};

use crate::query::RequestOptions;

/// Largest `limit` the kraken API accepts.
pub const MAX_LIMIT: u32 = 100;

/// A page of results from the Twitch API.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Total number of items across all pages (if known).
    pub total: Option<u64>,
    /// Offset of the first item on this page.
    pub offset: u32,
    /// Requested page size.
    pub limit: u32,
    /// Cursor for the next page, for endpoints that return `_cursor`.
    pub cursor: Option<String>,
    /// Whether there are more pages.
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Create a new page from items and pagination info.
    #[must_use]
    pub fn new(items: Vec<T>, offset: u32, limit: u32, total: Option<u64>) -> Self {
        let has_more = match total {
            Some(t) => u64::from(offset) + (items.len() as u64) < t,
            None => items.len() >= limit as usize,
        };
        Self {
            items,
            total,
            offset,
            limit,
            cursor: None,
            has_more,
        }
    }

    /// Attach the API's `_cursor`. Empty cursors mean "no next page".
    #[must_use]
    pub fn with_cursor(mut self, cursor: Option<String>) -> Self {
        self.cursor = cursor.filter(|c| !c.is_empty());
        if self.cursor.is_none() && self.total.is_none() {
            self.has_more = false;
        }
        self
    }

    /// Parameters that fetch the page after this one.
    #[must_use]
    pub fn next_params(&self) -> PaginationParams {
        PaginationParams {
            limit: Some(self.limit),
            offset: Some(self.offset + self.items.len() as u32),
            cursor: self.cursor.clone(),
        }
    }

    /// Map the items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            offset: self.offset,
            limit: self.limit,
            cursor: self.cursor,
            has_more: self.has_more,
        }
    }

    /// Returns true if this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns an iterator over the items in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Query parameters for paginated requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Maximum number of items to return (max 100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Number of items to skip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    /// Cursor returned by the previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl PaginationParams {
    /// Pagination params for a specific window.
    #[must_use]
    pub fn window(offset: u32, limit: u32) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
            cursor: None,
        }
    }

    /// Effective limit, clamped to what the API accepts.
    pub fn effective_limit(&self, default: u32) -> u32 {
        self.limit.unwrap_or(default).clamp(1, MAX_LIMIT)
    }

    /// Append these parameters to `options` as `limit`, `offset`, `cursor`.
    #[must_use]
    pub fn apply(&self, options: RequestOptions, default_limit: u32) -> RequestOptions {
        options
            .with("limit", self.effective_limit(default_limit))
            .with_opt("offset", self.offset)
            .with_opt("cursor", self.cursor.as_deref())
    }
}
