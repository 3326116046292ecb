//! Input types for the question service

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::question::QuestionType;

/// Data needed to create a question with its options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateQuestion {
    pub text: String,
    pub question_type: QuestionType,
    pub que_order: i32,
    /// Option texts, in display order
    #[serde(default)]
    pub options: Vec<String>,
    pub matrix_rows: Option<Vec<String>>,
    pub matrix_cols: Option<Vec<String>>,
}

/// One raw answer as submitted by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmittedAnswer {
    pub user_id: Uuid,
    pub question_id: i64,
    pub answer: serde_json::Value,
}
