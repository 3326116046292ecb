//! Question service module
//!
//! Questionnaire authoring: questions with their options or matrix labels,
//! listing, lookup, deletion, and the answer submission entry point.

mod service;
mod types;

#[cfg(test)]
mod tests;

pub use service::QuestionService;
pub use types::{CreateQuestion, SubmittedAnswer};
