//! Unit tests for answers and answer payloads

use serde_json::json;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::domain::entities::answer::{AnswerPayload, UserAnswer};
use crate::domain::entities::audit::AuditFields;
use crate::domain::entities::question::QuestionType;
use crate::repositories::Entity;

fn matrix(rows: &[(&str, &[&str])]) -> AnswerPayload {
    let selections: BTreeMap<String, Vec<String>> = rows
        .iter()
        .map(|(row, cols)| (row.to_string(), cols.iter().map(|c| c.to_string()).collect()))
        .collect();
    AnswerPayload::Matrix { selections }
}

#[test]
fn test_payload_is_tagged_by_kind() {
    let payload = AnswerPayload::MultipleChoice { option_ids: vec![1, 2] };
    assert_eq!(
        serde_json::to_value(&payload).unwrap(),
        json!({"kind": "multiple_choice", "option_ids": [1, 2]})
    );

    let decoded: AnswerPayload =
        serde_json::from_value(json!({"kind": "open_text", "text": "hello"})).unwrap();
    assert_eq!(decoded, AnswerPayload::OpenText { text: "hello".into() });
}

#[test]
fn test_accepts_matching_shapes() {
    assert!(AnswerPayload::SingleChoice { option_id: 1 }.accepts(QuestionType::SingleChoice));
    assert!(!AnswerPayload::SingleChoice { option_id: 1 }.accepts(QuestionType::MultipleChoice));
    assert!(AnswerPayload::OpenText { text: "x".into() }.accepts(QuestionType::OpenText));
    assert!(!AnswerPayload::OpenText { text: "x".into() }.accepts(QuestionType::MatrixAny));
}

#[test]
fn test_matrix_one_requires_single_column_per_row() {
    let one_each = matrix(&[("Shirt", &["Red"]), ("Hat", &["Blue"])]);
    let two_cols = matrix(&[("Shirt", &["Red", "Blue"])]);

    assert!(one_each.accepts(QuestionType::MatrixOne));
    assert!(!two_cols.accepts(QuestionType::MatrixOne));
    assert!(two_cols.accepts(QuestionType::MatrixAny));
}

#[test]
fn test_unknown_kind_is_rejected() {
    assert!(serde_json::from_value::<AnswerPayload>(json!({"kind": "ranking"})).is_err());
}

#[test]
fn test_answer_record_round_trip() {
    let answer = UserAnswer {
        id: 12,
        user_id: Uuid::new_v4(),
        question_id: 3,
        answer: matrix(&[("Shirt", &["Red"])]),
        audit: AuditFields::new(),
    };

    let record = answer.to_record().unwrap();
    assert_eq!(
        record.get("answer_data").cloned().map(|v| v.into_json()),
        Some(json!({"kind": "matrix", "selections": {"Shirt": ["Red"]}}))
    );

    let restored = UserAnswer::from_record(record).unwrap();
    assert_eq!(restored, answer);
}
