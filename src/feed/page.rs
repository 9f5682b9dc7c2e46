//! Offset pagination over feed items.

use crate::config::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

/// A requested window of episodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl PageRequest {
    /// Builds a request; a missing limit means [`DEFAULT_PAGE_LIMIT`] and any
    /// limit is clamped to `1..=MAX_PAGE_LIMIT`.
    pub fn new(offset: usize, limit: Option<usize>) -> Self {
        Self {
            offset,
            limit: limit
                .unwrap_or(DEFAULT_PAGE_LIMIT)
                .clamp(1, MAX_PAGE_LIMIT),
        }
    }

    /// Index range of this page within a list of `total` items.
    ///
    /// Offsets past the end give an empty range rather than an error.
    pub fn range(&self, total: usize) -> std::ops::Range<usize> {
        let start = self.offset.min(total);
        let end = self.offset.saturating_add(self.limit).min(total);
        start..end
    }
}
