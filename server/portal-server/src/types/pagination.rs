//! Pagination types and utilities for consistent pagination across all endpoints

use crate::error::{ApiResponse, PaginationInfo, ResponseMetadata};
use serde::Deserialize;

/// Standard pagination parameters for list endpoints
///
/// All list endpoints should use this type for consistent pagination behavior.
#[derive(Debug, Deserialize, Clone)]
pub struct PaginationParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl PaginationParams {
    /// Get the page number (defaults to 1, minimum 1)
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Get the page size (defaults to 20, clamped between 1 and 100)
    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(20).clamp(1, 100)
    }

    /// Calculate the offset into the result set. Widened before multiplying
    /// so an absurd page number cannot overflow u32.
    pub fn offset(&self) -> usize {
        (self.page() as usize - 1) * self.page_size() as usize
    }

    /// Calculate total pages given a total count
    pub fn total_pages(&self, total_count: i64) -> u32 {
        if total_count == 0 {
            return 1;
        }
        ((total_count as f64) / (self.page_size() as f64)).ceil() as u32
    }

    /// Create response metadata with pagination info
    pub fn to_metadata(&self, total_count: i64) -> ResponseMetadata {
        let total_pages = self.total_pages(total_count);

        ResponseMetadata {
            pagination: Some(PaginationInfo {
                page: self.page() as i32,
                page_size: self.page_size() as i32,
                total_pages: total_pages as i32,
                has_next: self.page() < total_pages,
                has_previous: self.page() > 1,
            }),
            total_count: Some(total_count),
        }
    }

    /// Take the current page out of a full in-memory result set and wrap it
    /// with pagination metadata.
    pub fn paginate<T>(&self, items: Vec<T>) -> ApiResponse<Vec<T>> {
        let total_count = items.len() as i64;
        let page: Vec<T> = items
            .into_iter()
            .skip(self.offset())
            .take(self.page_size() as usize)
            .collect();
        crate::error::api_success_with_meta(page, self.to_metadata(total_count))
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: Some(1),
            page_size: Some(20),
        }
    }
}
