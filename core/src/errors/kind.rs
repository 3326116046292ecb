//! Error kinds with their stable client-facing code and HTTP status

use sv_shared::error_codes;

/// Classification of a [`DomainError`](super::DomainError)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    DuplicateResource,
    ResourceNotFound,
    InvalidField,
    InvalidOperator,
    InvalidSortOrder,
    Database,
    Unauthorized,
    Forbidden,
    Configuration,
    Internal,
}

impl ErrorKind {
    /// Machine-readable code sent as `error_code`
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Validation => error_codes::VALIDATION_ERROR,
            ErrorKind::DuplicateResource => error_codes::DUPLICATE_RESOURCE,
            ErrorKind::ResourceNotFound => error_codes::RESOURCE_NOT_FOUND,
            ErrorKind::InvalidField => error_codes::INVALID_FIELD,
            ErrorKind::InvalidOperator => error_codes::INVALID_OPERATOR,
            ErrorKind::InvalidSortOrder => error_codes::INVALID_SORT_ORDER,
            ErrorKind::Database => error_codes::DATABASE_ERROR,
            ErrorKind::Unauthorized => error_codes::UNAUTHORIZED,
            ErrorKind::Forbidden => error_codes::FORBIDDEN,
            ErrorKind::Configuration => error_codes::CONFIGURATION_ERROR,
            ErrorKind::Internal => error_codes::INTERNAL_ERROR,
        }
    }

    /// HTTP status associated with the kind
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::Validation
            | ErrorKind::DuplicateResource
            | ErrorKind::InvalidField
            | ErrorKind::InvalidOperator
            | ErrorKind::InvalidSortOrder => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::ResourceNotFound => 404,
            ErrorKind::Database | ErrorKind::Configuration | ErrorKind::Internal => 500,
        }
    }

    /// Server-side failures whose details must not reach clients
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}
