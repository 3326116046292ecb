//! Request and response bodies

pub mod query;
pub mod question;
pub mod user;

use serde::de::DeserializeOwned;

use sv_core::errors::DomainResult;

use crate::handlers::error::invalid_json;

pub use query::{FilterRequest, ListRequest};
pub use question::{AnswerRequest, OptionCreate, OptionRead, QuestionCreateRequest, QuestionRead};
pub use user::{UserCreateRequest, UserRead};

/// Decode a body that may be left empty
pub fn parse_optional_body<T: DeserializeOwned>(body: &[u8]) -> DomainResult<Option<T>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| invalid_json(&e))
}
