use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;
use crate::error::ApiError;

/// Query-string pagination parameters, already clamped and validated.
#[derive(Debug, Clone, Copy)]
pub struct PageParams {
    pub limit: i64,
    pub offset: i64,
}

/// Raw query shape shared by list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PageParams {
    pub fn from_query(query: &PageQuery, api: &ApiConfig) -> Result<Self, ApiError> {
        let limit = query.limit.unwrap_or(api.default_page_limit);
        let offset = query.offset.unwrap_or(0);

        if limit < 1 {
            return Err(ApiError::validation("limit must be a positive integer"));
        }
        if offset < 0 {
            return Err(ApiError::validation("offset must not be negative"));
        }

        Ok(Self {
            limit: limit.min(api.max_page_limit),
            offset,
        })
    }
}

/// Pagination metadata attached to every list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_offset: Option<i64>,
    pub previous_offset: Option<i64>,
    pub total_pages: i64,
    pub current_page: i64,
}

impl PageMeta {
    pub fn new(total: i64, params: PageParams) -> Self {
        let PageParams { limit, offset } = params;
        let has_next = offset + limit < total;
        let has_previous = offset > 0;

        Self {
            total,
            limit,
            offset,
            has_next,
            has_previous,
            next_offset: has_next.then_some(offset + limit),
            previous_offset: has_previous.then_some((offset - limit).max(0)),
            // Empty result sets still report one (empty) page.
            total_pages: ((total + limit - 1) / limit).max(1),
            current_page: offset / limit + 1,
        }
    }
}
