//! API response types and wrappers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Standard success envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Always `true` for this envelope
    pub success: bool,

    /// Short human-readable summary
    pub message: String,

    /// Response payload
    pub data: T,

    /// Response metadata
    pub meta: ResponseMeta,
}

/// Response metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMeta {
    /// Response timestamp
    pub timestamp: DateTime<Utc>,

    /// Request path, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Default for ResponseMeta {
    fn default() -> Self {
        Self {
            timestamp: Utc::now(),
            path: None,
        }
    }
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            meta: ResponseMeta::default(),
        }
    }

    /// Record the request path in the metadata
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.meta.path = Some(path.into());
        self
    }
}
