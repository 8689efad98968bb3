//! Shared DTO types used across multiple endpoints.

use serde::Deserialize;
use utoipa::IntoParams;

/// Pagination query parameters for list endpoints.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Items per page (max 100). Defaults to 10.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

impl PaginationParams {
    /// Clamps the page to at least 1 and the limit to `[1, 100]`.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            page: self.page.max(1),
            limit: self.limit.clamp(1, 100),
        }
    }

    /// Row offset for the clamped page.
    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit.clamp(1, 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range_values() {
        let params = PaginationParams { page: 0, limit: 500 };
        let clamped = params.clamped();
        assert_eq!(clamped.page, 1);
        assert_eq!(clamped.limit, 100);
    }

    #[test]
    fn offset_follows_page() {
        let params = PaginationParams { page: 3, limit: 10 };
        assert_eq!(params.offset(), 20);
    }

    #[test]
    fn defaults_apply_on_empty_query() {
        let params: PaginationParams = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 10);
    }
}
