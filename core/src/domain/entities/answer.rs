//! Recorded answers and their typed payloads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::audit::AuditFields;
use super::question::QuestionType;
use crate::errors::{DomainError, DomainResult};
use crate::repositories::schema::{Column, ColumnKind, KeyGeneration, Record, TableSchema};
use crate::repositories::Entity;

/// The `user_answers` table
pub static USER_ANSWERS: TableSchema = TableSchema {
    table: "user_answers",
    entity: "UserAnswer",
    primary_key: "id",
    key_generation: KeyGeneration::Serial,
    columns: &[
        Column::new("id", ColumnKind::Int8),
        Column::new("user_id", ColumnKind::Uuid),
        Column::new("question_id", ColumnKind::Int8).references("questions"),
        Column::new("answer_data", ColumnKind::Json),
        AuditFields::CREATED_AT,
        AuditFields::UPDATED_AT,
        AuditFields::CREATED_BY,
        AuditFields::UPDATED_BY,
        AuditFields::IS_DELETED,
    ],
};

/// Answer content, tagged by shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerPayload {
    SingleChoice { option_id: i64 },
    MultipleChoice { option_ids: Vec<i64> },
    /// Selected column labels keyed by row label
    Matrix { selections: BTreeMap<String, Vec<String>> },
    OpenText { text: String },
}

impl AnswerPayload {
    /// Whether this payload shape fits a question of `question_type`
    pub fn accepts(&self, question_type: QuestionType) -> bool {
        match (self, question_type) {
            (AnswerPayload::SingleChoice { .. }, QuestionType::SingleChoice) => true,
            (AnswerPayload::MultipleChoice { .. }, QuestionType::MultipleChoice) => true,
            (AnswerPayload::Matrix { selections }, QuestionType::MatrixOne) => {
                selections.values().all(|cols| cols.len() == 1)
            }
            (AnswerPayload::Matrix { .. }, QuestionType::MatrixAny) => true,
            (AnswerPayload::OpenText { .. }, QuestionType::OpenText) => true,
            _ => false,
        }
    }
}

/// One user's answer to one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAnswer {
    /// Assigned by the store; `0` until persisted
    pub id: i64,
    pub user_id: Uuid,
    pub question_id: i64,
    pub answer: AnswerPayload,
    #[serde(flatten)]
    pub audit: AuditFields,
}

impl Entity for UserAnswer {
    type Id = i64;

    fn schema() -> &'static TableSchema {
        &USER_ANSWERS
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn to_record(&self) -> DomainResult<Record> {
        let mut record = Record::new()
            .with("id", self.id)
            .with("user_id", self.user_id)
            .with("question_id", self.question_id);
        record.set_json("answer_data", &self.answer)?;
        self.audit.write_to(&mut record);
        Ok(record)
    }

    fn from_record(mut record: Record) -> DomainResult<Self> {
        let answer = record
            .take_json::<AnswerPayload>("answer_data")?
            .ok_or_else(|| DomainError::internal("Column 'answer_data' is null"))?;
        Ok(Self {
            id: record.take("id")?,
            user_id: record.take("user_id")?,
            question_id: record.take("question_id")?,
            answer,
            audit: AuditFields::read_from(&mut record)?,
        })
    }
}
