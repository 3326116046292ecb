//! Unit tests for question and option entities

use serde_json::json;

use crate::domain::entities::question::{
    Question, QuestionOption, QuestionType, QUESTIONS, QUESTION_OPTIONS,
};
use crate::repositories::{Entity, FieldValue, KeyGeneration};

#[test]
fn test_question_type_wire_names() {
    for question_type in [
        QuestionType::SingleChoice,
        QuestionType::MultipleChoice,
        QuestionType::MatrixOne,
        QuestionType::MatrixAny,
        QuestionType::OpenText,
    ] {
        let encoded = serde_json::to_value(question_type).unwrap();
        assert_eq!(encoded, json!(question_type.as_str()));
        assert_eq!(question_type.as_str().parse::<QuestionType>().unwrap(), question_type);
    }
}

#[test]
fn test_question_type_accepts_matrix_aliases() {
    let single: QuestionType = serde_json::from_value(json!("matrix_single")).unwrap();
    let multiple: QuestionType = serde_json::from_value(json!("matrix_multiple")).unwrap();
    assert_eq!(single, QuestionType::MatrixOne);
    assert_eq!(multiple, QuestionType::MatrixAny);
    assert_eq!("matrix_single".parse::<QuestionType>().unwrap(), QuestionType::MatrixOne);
}

#[test]
fn test_unknown_question_type_is_a_validation_error() {
    let err = "ranking".parse::<QuestionType>().unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
    assert!(serde_json::from_value::<QuestionType>(json!("ranking")).is_err());
}

#[test]
fn test_choice_classification() {
    assert!(QuestionType::SingleChoice.is_choice());
    assert!(QuestionType::MultipleChoice.is_choice());
    assert!(!QuestionType::MatrixOne.is_choice());
    assert!(!QuestionType::OpenText.is_choice());
}

#[test]
fn test_question_record_round_trip() {
    let mut question = Question::new("Favourite colours?", QuestionType::MatrixAny, 3).with_matrix(
        Some(vec!["Shirt".into(), "Hat".into()]),
        Some(vec!["Red".into(), "Blue".into()]),
    );
    question.id = 11;

    let record = question.to_record().unwrap();
    assert_eq!(record.get("type"), Some(&FieldValue::from("matrix_any")));
    assert_eq!(record.get("matrix_rows"), Some(&FieldValue::Json(json!(["Shirt", "Hat"]))));

    let restored = Question::from_record(record).unwrap();
    assert_eq!(restored, question);
}

#[test]
fn test_question_without_matrix_stores_nulls() {
    let question = Question::new("Name?", QuestionType::OpenText, 1);
    let record = question.to_record().unwrap();
    assert_eq!(record.get("matrix_cols"), Some(&FieldValue::Null));

    let restored = Question::from_record(record).unwrap();
    assert!(restored.matrix_rows.is_none());
    assert!(restored.matrix_cols.is_none());
}

#[test]
fn test_question_serializes_type_field() {
    let question = Question::new("Pick one", QuestionType::SingleChoice, 1);
    let value = serde_json::to_value(&question).unwrap();
    assert_eq!(value["type"], json!("single_choice"));
    assert_eq!(value["is_deleted"], json!(false));
}

#[test]
fn test_option_references_questions() {
    assert_eq!(QUESTIONS.key_generation, KeyGeneration::Serial);
    let column = QUESTION_OPTIONS.column("question_id").unwrap();
    assert_eq!(column.references, Some("questions"));
    assert_eq!(QUESTION_OPTIONS.references_to("questions").count(), 1);
}

#[test]
fn test_option_record_round_trip() {
    let mut option = QuestionOption::new(4, "Yes");
    option.id = 9;
    let restored = QuestionOption::from_record(option.to_record().unwrap()).unwrap();
    assert_eq!(restored, option);
}
