//! HTTP error handling

pub mod error;

pub use error::{
    invalid_input, json_error_handler, not_found, path_error_handler, validation_failed, ApiError,
    InRequest, RequestContext,
};
