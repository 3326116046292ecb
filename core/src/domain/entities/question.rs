//! Survey question and option entities.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::audit::AuditFields;
use crate::errors::{DomainError, DomainResult};
use crate::repositories::schema::{Column, ColumnKind, KeyGeneration, Record, TableSchema};
use crate::repositories::Entity;

/// Minimum number of options a choice question must offer
pub const MIN_CHOICE_OPTIONS: usize = 2;

/// The `questions` table
pub static QUESTIONS: TableSchema = TableSchema {
    table: "questions",
    entity: "Question",
    primary_key: "id",
    key_generation: KeyGeneration::Serial,
    columns: &[
        Column::new("id", ColumnKind::Int8),
        Column::new("text", ColumnKind::Text),
        Column::new("type", ColumnKind::Text),
        Column::new("que_order", ColumnKind::Int4),
        Column::new("matrix_rows", ColumnKind::Json).nullable(),
        Column::new("matrix_cols", ColumnKind::Json).nullable(),
        AuditFields::CREATED_AT,
        AuditFields::UPDATED_AT,
        AuditFields::CREATED_BY,
        AuditFields::UPDATED_BY,
        AuditFields::IS_DELETED,
    ],
};

/// The `question_options` table, owned by `questions`
pub static QUESTION_OPTIONS: TableSchema = TableSchema {
    table: "question_options",
    entity: "QuestionOption",
    primary_key: "id",
    key_generation: KeyGeneration::Serial,
    columns: &[
        Column::new("id", ColumnKind::Int8),
        Column::new("question_id", ColumnKind::Int8).references("questions"),
        Column::new("text", ColumnKind::Text),
        AuditFields::CREATED_AT,
        AuditFields::UPDATED_AT,
        AuditFields::CREATED_BY,
        AuditFields::UPDATED_BY,
        AuditFields::IS_DELETED,
    ],
};

/// Kind of answer a question expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    SingleChoice,
    MultipleChoice,
    /// Matrix with exactly one column per row
    #[serde(alias = "matrix_single")]
    MatrixOne,
    /// Matrix with any number of columns per row
    #[serde(alias = "matrix_multiple")]
    MatrixAny,
    OpenText,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::SingleChoice => "single_choice",
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::MatrixOne => "matrix_one",
            QuestionType::MatrixAny => "matrix_any",
            QuestionType::OpenText => "open_text",
        }
    }

    /// Choice questions need at least [`MIN_CHOICE_OPTIONS`] options
    pub fn is_choice(&self) -> bool {
        matches!(self, QuestionType::SingleChoice | QuestionType::MultipleChoice)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single_choice" => Ok(QuestionType::SingleChoice),
            "multiple_choice" => Ok(QuestionType::MultipleChoice),
            "matrix_one" | "matrix_single" => Ok(QuestionType::MatrixOne),
            "matrix_any" | "matrix_multiple" => Ok(QuestionType::MatrixAny),
            "open_text" => Ok(QuestionType::OpenText),
            other => Err(DomainError::validation(format!(
                "Unknown question type '{}'",
                other
            ))),
        }
    }
}

/// A survey question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Assigned by the store; `0` until persisted
    pub id: i64,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub que_order: i32,
    pub matrix_rows: Option<Vec<String>>,
    pub matrix_cols: Option<Vec<String>>,
    #[serde(flatten)]
    pub audit: AuditFields,
}

impl Question {
    pub fn new(text: impl Into<String>, question_type: QuestionType, que_order: i32) -> Self {
        Self {
            id: 0,
            text: text.into(),
            question_type,
            que_order,
            matrix_rows: None,
            matrix_cols: None,
            audit: AuditFields::new(),
        }
    }

    pub fn with_matrix(mut self, rows: Option<Vec<String>>, cols: Option<Vec<String>>) -> Self {
        self.matrix_rows = rows;
        self.matrix_cols = cols;
        self
    }
}

impl Entity for Question {
    type Id = i64;

    fn schema() -> &'static TableSchema {
        &QUESTIONS
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn to_record(&self) -> DomainResult<Record> {
        let mut record = Record::new()
            .with("id", self.id)
            .with("text", self.text.as_str())
            .with("type", self.question_type.as_str())
            .with("que_order", self.que_order);
        match &self.matrix_rows {
            Some(rows) => record.set_json("matrix_rows", rows)?,
            None => record.set("matrix_rows", None::<String>),
        };
        match &self.matrix_cols {
            Some(cols) => record.set_json("matrix_cols", cols)?,
            None => record.set("matrix_cols", None::<String>),
        };
        self.audit.write_to(&mut record);
        Ok(record)
    }

    fn from_record(mut record: Record) -> DomainResult<Self> {
        let question_type: String = record.take("type")?;
        Ok(Self {
            id: record.take("id")?,
            text: record.take("text")?,
            question_type: question_type.parse().map_err(|_| {
                DomainError::internal(format!("Stored question type '{}' is unknown", question_type))
            })?,
            que_order: record.take("que_order")?,
            matrix_rows: record.take_json("matrix_rows")?,
            matrix_cols: record.take_json("matrix_cols")?,
            audit: AuditFields::read_from(&mut record)?,
        })
    }
}

/// One selectable option of a choice question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOption {
    /// Assigned by the store; `0` until persisted
    pub id: i64,
    pub question_id: i64,
    pub text: String,
    #[serde(flatten)]
    pub audit: AuditFields,
}

impl QuestionOption {
    pub fn new(question_id: i64, text: impl Into<String>) -> Self {
        Self {
            id: 0,
            question_id,
            text: text.into(),
            audit: AuditFields::new(),
        }
    }
}

impl Entity for QuestionOption {
    type Id = i64;

    fn schema() -> &'static TableSchema {
        &QUESTION_OPTIONS
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn to_record(&self) -> DomainResult<Record> {
        let mut record = Record::new()
            .with("id", self.id)
            .with("question_id", self.question_id)
            .with("text", self.text.as_str());
        self.audit.write_to(&mut record);
        Ok(record)
    }

    fn from_record(mut record: Record) -> DomainResult<Self> {
        Ok(Self {
            id: record.take("id")?,
            question_id: record.take("question_id")?,
            text: record.take("text")?,
            audit: AuditFields::read_from(&mut record)?,
        })
    }
}

/// A question together with its eagerly loaded options
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionWithOptions {
    pub question: Question,
    pub options: Vec<QuestionOption>,
}
