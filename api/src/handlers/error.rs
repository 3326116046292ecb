//! Error responder
//!
//! Turns domain errors into the uniform error envelope and logs them with the
//! request they failed on.

use actix_web::error::{JsonPayloadError, PathError};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::fmt;
use validator::ValidationErrors;

use sv_core::errors::{DomainError, DomainResult};
use sv_shared::{error_codes, ErrorResponse};

use crate::middleware::{RequestIdExt, REQUEST_ID_HEADER};

/// Message used for every failure that is not a domain error
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Field named in serde messages such as "missing field `email`"
static SERDE_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"field `([A-Za-z0-9_]+)`").expect("valid field pattern"));

/// Where the failing request came from
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    pub path: String,
    pub method: String,
    pub request_id: Option<String>,
}

impl RequestContext {
    pub fn from_request(req: &HttpRequest) -> Self {
        Self {
            path: req.path().to_string(),
            method: req.method().to_string(),
            request_id: req.request_id(),
        }
    }
}

/// A domain error bound to the request that produced it
#[derive(Debug)]
pub struct ApiError {
    pub error: DomainError,
    pub context: RequestContext,
}

impl ApiError {
    pub fn with_context(error: DomainError, req: &HttpRequest) -> Self {
        Self {
            error,
            context: RequestContext::from_request(req),
        }
    }

    /// The envelope sent to the client
    ///
    /// Server-side failures keep their message but never their details.
    pub fn envelope(&self) -> ErrorResponse {
        let details = if self.error.kind().is_server_error() {
            Map::new()
        } else {
            self.error.details()
        };

        ErrorResponse::new(
            self.error.code(),
            self.error.to_string(),
            self.error.status_code(),
        )
        .with_details(details)
        .with_request_id(self.context.request_id.clone())
    }

    fn log(&self) {
        let status_code = self.error.status_code();
        if self.error.kind().is_server_error() {
            tracing::error!(
                error_code = self.error.code(),
                status_code,
                path = %self.context.path,
                method = %self.context.method,
                request_id = ?self.context.request_id,
                error = %self.error,
                "Request failed"
            );
        } else {
            tracing::warn!(
                error_code = self.error.code(),
                status_code,
                path = %self.context.path,
                method = %self.context.method,
                request_id = ?self.context.request_id,
                error = %self.error,
                "Request rejected"
            );
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        self.log();
        let mut response = HttpResponse::build(self.status_code());
        if let Some(value) = self
            .context
            .request_id
            .as_deref()
            .and_then(|id| HeaderValue::from_str(id).ok())
        {
            response.insert_header((HeaderName::from_static(REQUEST_ID_HEADER), value));
        }
        response.json(self.envelope())
    }
}

/// Attach the current request to a domain result
pub trait InRequest<T> {
    fn in_request(self, req: &HttpRequest) -> Result<T, ApiError>;
}

impl<T> InRequest<T> for DomainResult<T> {
    fn in_request(self, req: &HttpRequest) -> Result<T, ApiError> {
        self.map_err(|error| ApiError::with_context(error, req))
    }
}

/// Envelope for failures that never became a domain error
pub fn unexpected_error(request_id: Option<String>) -> ErrorResponse {
    ErrorResponse::new(
        error_codes::INTERNAL_ERROR,
        UNEXPECTED_ERROR_MESSAGE,
        StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
    )
    .with_request_id(request_id)
}

/// `Validation` error carrying `{field: message}` under `validation_errors`
pub fn invalid_input<I, K>(fields: I) -> DomainError
where
    I: IntoIterator<Item = (K, String)>,
    K: Into<String>,
{
    let errors: Map<String, Value> = fields
        .into_iter()
        .map(|(field, message)| (field.into(), Value::String(message)))
        .collect();

    let mut details = Map::new();
    details.insert("validation_errors".to_string(), Value::Object(errors));
    DomainError::validation_with("Request validation failed", details)
}

/// Convert `validator` failures, first message per field
pub fn validation_failed(errors: &ValidationErrors) -> DomainError {
    invalid_input(errors.field_errors().into_iter().map(|(field, errors)| {
        let message = errors
            .first()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("failed '{}' check", e.code))
            })
            .unwrap_or_else(|| "is invalid".to_string());
        (field.to_string(), message)
    }))
}

/// Convert a rejected JSON body
pub fn invalid_body(err: &JsonPayloadError) -> DomainError {
    match err {
        JsonPayloadError::Deserialize(inner) => invalid_json(inner),
        other => invalid_input([("body", other.to_string())]),
    }
}

/// Convert a serde failure, naming the field when serde does
pub fn invalid_json(err: &serde_json::Error) -> DomainError {
    let message = err.to_string();
    let field = SERDE_FIELD
        .captures(&message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "body".to_string());
    invalid_input([(field, message)])
}

/// `JsonConfig` error handler
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    ApiError::with_context(invalid_body(&err), req).into()
}

/// `PathConfig` error handler
pub fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    let error = invalid_input([("path", err.to_string())]);
    ApiError::with_context(error, req).into()
}

/// Default service for unmatched routes
pub async fn not_found(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    Err(ApiError::with_context(
        DomainError::not_found("Route", req.path()),
        &req,
    ))
}
