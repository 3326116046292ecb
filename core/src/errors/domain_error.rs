use serde_json::{json, Map, Value};
use std::fmt::Display;
use sv_shared::ConfigError;
use thiserror::Error;

use super::ErrorKind;

/// Core domain errors
///
/// Every failure crossing the service boundary is one of these variants.
/// Each variant maps to exactly one [`ErrorKind`], which fixes the error code
/// and HTTP status, and carries the context rendered as `details`.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{message}")]
    Validation {
        message: String,
        details: Map<String, Value>,
    },

    #[error("{resource_type} '{resource_name}' already exists")]
    DuplicateResource {
        resource_type: String,
        resource_name: String,
    },

    #[error("{resource_type} with id {resource_id} not found")]
    ResourceNotFound {
        resource_type: String,
        resource_id: String,
    },

    #[error("Invalid field '{field_name}'. Available fields: {}", .available_fields.join(", "))]
    InvalidField {
        field_name: String,
        available_fields: Vec<String>,
    },

    #[error("Invalid operator '{operator}'. Supported operators: {}", .supported_operators.join(", "))]
    InvalidOperator {
        operator: String,
        supported_operators: Vec<String>,
    },

    #[error("Invalid sort order '{sort_order}'. Must be 'asc' or 'desc'")]
    InvalidSortOrder { sort_order: String },

    #[error("{message}")]
    Database {
        message: String,
        operation: Option<String>,
    },

    #[error("{message}")]
    Unauthorized { message: String },

    #[error("{message}")]
    Forbidden { message: String },

    #[error("{message}")]
    Configuration {
        message: String,
        config_key: Option<String>,
    },

    #[error("{message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation {
            message: message.into(),
            details: Map::new(),
        }
    }

    pub fn validation_with(message: impl Into<String>, details: Map<String, Value>) -> Self {
        DomainError::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn duplicate(resource_type: impl Into<String>, resource_name: impl Into<String>) -> Self {
        DomainError::DuplicateResource {
            resource_type: resource_type.into(),
            resource_name: resource_name.into(),
        }
    }

    pub fn not_found(resource_type: impl Into<String>, resource_id: impl Display) -> Self {
        DomainError::ResourceNotFound {
            resource_type: resource_type.into(),
            resource_id: resource_id.to_string(),
        }
    }

    pub fn invalid_field(field_name: impl Into<String>, available_fields: &[&str]) -> Self {
        DomainError::InvalidField {
            field_name: field_name.into(),
            available_fields: available_fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn invalid_operator(operator: impl Into<String>, supported_operators: &[&str]) -> Self {
        DomainError::InvalidOperator {
            operator: operator.into(),
            supported_operators: supported_operators.iter().map(|o| o.to_string()).collect(),
        }
    }

    pub fn invalid_sort_order(sort_order: impl Into<String>) -> Self {
        DomainError::InvalidSortOrder {
            sort_order: sort_order.into(),
        }
    }

    pub fn database(message: impl Into<String>, operation: Option<&str>) -> Self {
        DomainError::Database {
            message: message.into(),
            operation: operation.map(str::to_string),
        }
    }

    /// Unauthorized with an optional custom message
    pub fn unauthorized(message: Option<&str>) -> Self {
        DomainError::Unauthorized {
            message: message.unwrap_or("Authentication required").to_string(),
        }
    }

    /// Forbidden with an optional custom message
    pub fn forbidden(message: Option<&str>) -> Self {
        DomainError::Forbidden {
            message: message.unwrap_or("Access denied").to_string(),
        }
    }

    pub fn configuration(message: impl Into<String>, config_key: Option<&str>) -> Self {
        DomainError::Configuration {
            message: message.into(),
            config_key: config_key.map(str::to_string),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        DomainError::Internal {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Validation { .. } => ErrorKind::Validation,
            DomainError::DuplicateResource { .. } => ErrorKind::DuplicateResource,
            DomainError::ResourceNotFound { .. } => ErrorKind::ResourceNotFound,
            DomainError::InvalidField { .. } => ErrorKind::InvalidField,
            DomainError::InvalidOperator { .. } => ErrorKind::InvalidOperator,
            DomainError::InvalidSortOrder { .. } => ErrorKind::InvalidSortOrder,
            DomainError::Database { .. } => ErrorKind::Database,
            DomainError::Unauthorized { .. } => ErrorKind::Unauthorized,
            DomainError::Forbidden { .. } => ErrorKind::Forbidden,
            DomainError::Configuration { .. } => ErrorKind::Configuration,
            DomainError::Internal { .. } => ErrorKind::Internal,
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Structured context for the error envelope
    pub fn details(&self) -> Map<String, Value> {
        let value = match self {
            DomainError::Validation { details, .. } => return details.clone(),
            DomainError::DuplicateResource {
                resource_type,
                resource_name,
            } => json!({ "resource_type": resource_type, "resource_name": resource_name }),
            DomainError::ResourceNotFound {
                resource_type,
                resource_id,
            } => json!({ "resource_type": resource_type, "resource_id": resource_id }),
            DomainError::InvalidField {
                field_name,
                available_fields,
            } => json!({ "field_name": field_name, "available_fields": available_fields }),
            DomainError::InvalidOperator {
                operator,
                supported_operators,
            } => json!({ "operator": operator, "supported_operators": supported_operators }),
            DomainError::InvalidSortOrder { sort_order } => json!({ "sort_order": sort_order }),
            DomainError::Database {
                operation: Some(operation),
                ..
            } => json!({ "operation": operation }),
            DomainError::Configuration {
                config_key: Some(config_key),
                ..
            } => json!({ "config_key": config_key }),
            _ => Value::Null,
        };

        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    /// Prefix a store failure with the repository operation that hit it
    pub fn in_operation(self, operation: &str, context: impl Display) -> Self {
        match self {
            DomainError::Database { message, .. } => DomainError::Database {
                message: format!("{}: {}", context, message),
                operation: Some(operation.to_string()),
            },
            other => other,
        }
    }
}

impl From<ConfigError> for DomainError {
    fn from(err: ConfigError) -> Self {
        let key = err.key();
        DomainError::Configuration {
            message: err.to_string(),
            config_key: Some(key),
        }
    }
}
