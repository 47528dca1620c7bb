// ABOUTME: Page-number pagination metadata for list endpoints
// ABOUTME: No upper bound is placed on the page size
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Pagination block of a list response
///
/// `per_page` keeps its snake_case name on the wire, `totalPages` is camelCase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    /// 1-based page number
    pub page: u64,
    /// Requested page size
    pub per_page: u64,
    /// Number of records matching the query
    pub total: u64,
    /// `ceil(total / per_page)`, zero when `per_page` is zero
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
}

impl PaginationMeta {
    /// Compute pagination for `total` records
    #[must_use]
    pub const fn new(page: u64, per_page: u64, total: u64) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            total.div_ceil(per_page)
        };
        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }

    /// Index of the first record on this page
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }

    /// Slice `items` down to this page
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let len = items.len();
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX).min(len);
        let per_page = usize::try_from(self.per_page).unwrap_or(usize::MAX);
        let end = start.saturating_add(per_page).min(len);
        &items[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        let meta = PaginationMeta::new(1, 10, 10_001);
        assert_eq!(meta.total_pages, 1001);
    }

    #[test]
    fn test_zero_per_page() {
        let meta = PaginationMeta::new(1, 0, 50);
        assert_eq!(meta.total_pages, 0);
        assert!(meta.slice(&[1, 2, 3]).is_empty());
    }

    #[test]
    fn test_slice_past_end_is_empty() {
        let items: Vec<u32> = (0..25).collect();
        assert_eq!(PaginationMeta::new(3, 10, 25).slice(&items), &[20, 21, 22, 23, 24]);
        assert!(PaginationMeta::new(4, 10, 25).slice(&items).is_empty());
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(PaginationMeta::new(2, 5, 12)).unwrap();
        assert_eq!(json["per_page"], 5);
        assert_eq!(json["totalPages"], 3);
    }
}
