//! # Surveyor Core
//!
//! Core business logic and domain layer for the Surveyor backend.
//! This crate contains domain entities, business services, the generic
//! repository with its store traits, and the error taxonomy that form the
//! foundation of the application architecture.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::{CreateQuestion, CreateUser, QuestionService, SubmittedAnswer, UserService};
