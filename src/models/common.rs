use serde::{Deserialize, Serialize};

/// Generic API response wrapper used across all handlers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response with data
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    /// Create a successful response without data
    pub fn success_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            error: None,
        }
    }

    /// Create an error response
    pub fn error(message: impl Into<String>) -> Self {
        let msg = message.into();
        Self {
            success: false,
            message: msg.clone(),
            data: None,
            error: Some(msg),
        }
    }

    /// Create an error response with custom error message
    pub fn error_with_message(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Page request accepted by list endpoints.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PaginationParams {
    pub const DEFAULT_LIMIT: i64 = 20;
    pub const MAX_LIMIT: i64 = 100;

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT).clamp(1, Self::MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PaginationInfo {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationInfo,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, params: &PaginationParams, total: i64) -> Self {
        let limit = params.limit();
        Self {
            data,
            pagination: PaginationInfo {
                page: params.page(),
                limit,
                total,
                total_pages: (total + limit - 1) / limit,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_clamps_inputs() {
        let params = PaginationParams { page: Some(0), limit: Some(500) };
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), PaginationParams::MAX_LIMIT);
        assert_eq!(params.offset(), 0);

        let params = PaginationParams { page: Some(3), limit: None };
        assert_eq!(params.offset(), 40);
    }

    #[test]
    fn total_pages_rounds_up() {
        let params = PaginationParams { page: None, limit: Some(10) };
        let page = PaginatedResponse::new(vec![1, 2, 3], &params, 21);
        assert_eq!(page.pagination.total_pages, 3);
        let empty: PaginatedResponse<i32> = PaginatedResponse::new(vec![], &params, 0);
        assert_eq!(empty.pagination.total_pages, 0);
    }
}
