//! Domain entities representing core business objects.

pub mod answer;
pub mod audit;
pub mod question;
pub mod user;

pub use answer::{AnswerPayload, UserAnswer, USER_ANSWERS};
pub use audit::AuditFields;
pub use question::{
    Question, QuestionOption, QuestionType, QuestionWithOptions, MIN_CHOICE_OPTIONS,
    QUESTIONS, QUESTION_OPTIONS,
};
pub use user::{UserProfile, DEFAULT_USER_STATUS, USERS_PROFILE};

#[cfg(test)]
mod tests;
