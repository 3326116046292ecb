//! Shared error codes and the error envelope returned by every failing endpoint

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error envelope serialized for every failed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,

    /// Human-readable error message
    pub message: String,

    /// Stable machine-readable code (see [`error_codes`])
    pub error_code: String,

    /// HTTP status mirrored in the body
    pub status_code: u16,

    /// Structured context, empty when there is nothing to add
    #[serde(default)]
    pub details: Map<String, Value>,

    /// Correlation id taken from `X-Request-ID`
    pub request_id: Option<String>,
}

impl ErrorResponse {
    /// Create a new error envelope without details
    pub fn new(error_code: impl Into<String>, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            success: false,
            message: message.into(),
            error_code: error_code.into(),
            status_code,
            details: Map::new(),
            request_id: None,
        }
    }

    /// Replace the details map
    pub fn with_details(mut self, details: Map<String, Value>) -> Self {
        self.details = details;
        self
    }

    /// Attach the request correlation id
    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }
}

/// Error codes exposed to API clients
pub mod error_codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const DUPLICATE_RESOURCE: &str = "DUPLICATE_RESOURCE";
    pub const RESOURCE_NOT_FOUND: &str = "RESOURCE_NOT_FOUND";
    pub const INVALID_FIELD: &str = "INVALID_FIELD";
    pub const INVALID_OPERATOR: &str = "INVALID_OPERATOR";
    pub const INVALID_SORT_ORDER: &str = "INVALID_SORT_ORDER";
    pub const DATABASE_ERROR: &str = "DATABASE_ERROR";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const FORBIDDEN: &str = "FORBIDDEN";
    pub const CONFIGURATION_ERROR: &str = "CONFIGURATION_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}
