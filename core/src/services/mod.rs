//! Business services containing domain logic and use cases.
//!
//! Services borrow the caller's session for the duration of a request; the
//! caller decides when to commit.

pub mod question;
pub mod user;

pub use question::{CreateQuestion, QuestionService, SubmittedAnswer};
pub use user::{CreateUser, UserService};
