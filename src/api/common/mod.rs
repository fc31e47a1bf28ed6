//! Common API utilities shared across versions.

pub mod refs;

use serde::{Deserialize, Serialize};

const MAX_LIMIT: u32 = 100;

/// Standard pagination parameters
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: Some(1),
            limit: Some(20),
        }
    }
}

impl PaginationParams {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(20).clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> u32 {
        (self.page() - 1) * self.limit()
    }
}

/// Pagination metadata echoed back on every collection response.
#[derive(Debug, Serialize)]
pub struct ListMeta {
    pub page: u32,
    pub limit: u32,
    pub total_count: i64,
}

/// Collection envelope: `{ "meta": ..., "objects": [...] }`.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub meta: ListMeta,
    pub objects: Vec<T>,
}

impl<T> PaginatedResponse<T> {
    pub fn new(params: &PaginationParams, total_count: i64, objects: Vec<T>) -> Self {
        Self {
            meta: ListMeta {
                page: params.page(),
                limit: params.limit(),
                total_count,
            },
            objects,
        }
    }
}
