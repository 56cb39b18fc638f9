//! Response envelope shared by every endpoint

pub mod query;
pub mod validated_json;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::PaginatedResult;

pub use query::ApiQuery;
pub use validated_json::ValidatedJson;

/// Standard API response wrapper
///
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "data": null, "error": "..."}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    /// Payload; `null` on error
    pub data: Option<T>,
    /// Error description; omitted on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Payload for operations that only report success plus a message
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageData {
    pub message: String,
}

impl MessageData {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One page of items plus paging metadata
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    /// Total matching items across all pages
    pub total: u64,
    /// Current page (1-based)
    pub page: u32,
    pub limit: u32,
    /// Never less than 1
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    pub fn from_result<U>(result: PaginatedResult<U>, f: impl FnMut(U) -> T) -> Self {
        let result = result.map(f);
        Self {
            items: result.items,
            total: result.total,
            page: result.page,
            limit: result.limit,
            total_pages: result.total_pages,
        }
    }
}

/// Treat missing, blank and "all" filter values as no filter
pub fn filter_value(raw: &Option<String>) -> Option<&str> {
    raw.as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}
