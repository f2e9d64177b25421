//! Wire envelopes of the REST API
//!
//! Lists answer `{ data: [...], pagination: {...} }`, single entities answer
//! `{ data: {...}, message? }` and failures answer `{ error: {...} }`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total.div_ceil(u64::from(limit)) as u32
        };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, 10, 0)
    }
}

/// One page of a list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListEnvelope<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

/// A list page as the client hands it out
pub type Page<T> = ListEnvelope<T>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemEnvelope<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ApiError,
}

/// Error body answered by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    /// Per-field validation messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<BTreeMap<String, String>>,
    /// Business rule that refused the request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    /// HTTP status the error came with
    #[serde(skip)]
    pub status: u16,
}

/// Error codes used by the API
pub mod codes {
    pub const VALIDATION: &str = "VALIDATION_ERROR";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const CONFLICT: &str = "CONFLICT";
    pub const BUSINESS_RULE: &str = "BUSINESS_RULE";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const INTERNAL: &str = "INTERNAL_ERROR";
}

impl ApiError {
    pub fn new(status: u16, code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
            rule: None,
            status,
        }
    }

    pub fn with_details(mut self, details: BTreeMap<String, String>) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pagination_total_pages() {
        assert_eq!(Pagination::new(1, 10, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 10, 10).total_pages, 1);
        assert_eq!(Pagination::new(1, 10, 11).total_pages, 2);

        let p = Pagination::new(2, 10, 25);
        assert!(p.has_next());
        assert!(p.has_prev());
        assert!(!Pagination::new(3, 10, 25).has_next());
    }

    #[test]
    fn test_list_envelope_wire_format() {
        let body = json!({
            "data": [{"x": 1}],
            "pagination": {"page": 1, "limit": 10, "total": 1, "totalPages": 1}
        });
        let env: ListEnvelope<serde_json::Value> = serde_json::from_value(body).unwrap();
        assert_eq!(env.data.len(), 1);
        assert_eq!(env.pagination.total_pages, 1);
    }

    #[test]
    fn test_error_envelope_optional_fields() {
        let body = json!({"error": {"code": "NOT_FOUND", "message": "missing"}});
        let env: ErrorEnvelope = serde_json::from_value(body).unwrap();
        assert_eq!(env.error.code, codes::NOT_FOUND);
        assert!(env.error.details.is_none());
        assert!(env.error.rule.is_none());
    }
}
