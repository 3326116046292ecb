//! Tests for the question service

use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::{QuestionOption, QuestionType};
use crate::repositories::{finish, Filters, MemoryStore, Repository, Store};
use crate::services::question::{CreateQuestion, QuestionService, SubmittedAnswer};

fn choice(text: &str, question_type: QuestionType, que_order: i32, options: &[&str]) -> CreateQuestion {
    CreateQuestion {
        text: text.to_string(),
        question_type,
        que_order,
        options: options.iter().map(|o| o.to_string()).collect(),
        matrix_rows: None,
        matrix_cols: None,
    }
}

#[tokio::test]
async fn test_choice_question_needs_two_options() {
    let store = MemoryStore::new();
    let mut session = store.begin().await.unwrap();
    let mut service = QuestionService::new(&mut session);

    for question_type in [QuestionType::SingleChoice, QuestionType::MultipleChoice] {
        for options in [&[][..], &["A"][..]] {
            let err = service
                .create_question(choice("Pick one", question_type, 1, options))
                .await
                .unwrap_err();

            assert_eq!(err.code(), "VALIDATION_ERROR");
            assert_eq!(err.status_code(), 400);
            assert_eq!(err.to_string(), "At least two options are required for choice questions.");
            let details = err.details();
            assert_eq!(details["type"], json!(question_type.as_str()));
            assert_eq!(details["option_count"], json!(options.len()));
            assert_eq!(details["min_options"], json!(2));
        }
    }
    assert_eq!(store.count("questions").await, 0);
}

#[tokio::test]
async fn test_choice_question_keeps_option_count() {
    let store = MemoryStore::new();
    let mut session = store.begin().await.unwrap();
    let mut service = QuestionService::new(&mut session);

    let created = service
        .create_question(choice("Pick any", QuestionType::MultipleChoice, 2, &["A", "B", "C"]))
        .await
        .unwrap();

    assert!(created.question.id > 0);
    assert_eq!(created.options.len(), 3);
    assert!(created.options.iter().all(|o| o.question_id == created.question.id));
    let texts: Vec<&str> = created.options.iter().map(|o| o.text.as_str()).collect();
    assert_eq!(texts, vec!["A", "B", "C"]);
}

#[tokio::test]
async fn test_non_choice_questions_need_no_options() {
    let store = MemoryStore::new();
    let mut session = store.begin().await.unwrap();
    let mut service = QuestionService::new(&mut session);

    let mut matrix = choice("Rate", QuestionType::MatrixOne, 1, &[]);
    matrix.matrix_rows = Some(vec!["Speed".into(), "Price".into()]);
    matrix.matrix_cols = Some(vec!["Good".into(), "Bad".into()]);

    let created = service.create_question(matrix).await.unwrap();
    assert!(created.options.is_empty());
    assert_eq!(created.question.matrix_cols.as_deref(), Some(&["Good".to_string(), "Bad".to_string()][..]));

    let open = service
        .create_question(choice("Why?", QuestionType::OpenText, 2, &[]))
        .await
        .unwrap();
    assert!(open.question.matrix_rows.is_none());
}

#[tokio::test]
async fn test_list_questions_orders_by_que_order_and_loads_options() {
    let store = MemoryStore::new();
    let mut session = store.begin().await.unwrap();
    let mut service = QuestionService::new(&mut session);

    service
        .create_question(choice("Third", QuestionType::OpenText, 3, &[]))
        .await
        .unwrap();
    service
        .create_question(choice("First", QuestionType::SingleChoice, 1, &["Yes", "No"]))
        .await
        .unwrap();
    service
        .create_question(choice("Second", QuestionType::OpenText, 1, &[]))
        .await
        .unwrap();

    let listed = service.list_questions().await.unwrap();
    let texts: Vec<&str> = listed.iter().map(|q| q.question.text.as_str()).collect();
    assert_eq!(texts, vec!["First", "Second", "Third"]);
    assert_eq!(listed[0].options.len(), 2);
    assert!(listed[1].options.is_empty());
}

#[tokio::test]
async fn test_get_question() {
    let store = MemoryStore::new();
    let mut session = store.begin().await.unwrap();
    let mut service = QuestionService::new(&mut session);

    let created = service
        .create_question(choice("Pick", QuestionType::SingleChoice, 1, &["A", "B"]))
        .await
        .unwrap();

    let fetched = service.get_question(created.question.id).await.unwrap();
    assert_eq!(fetched, created);

    let err = service.get_question(999).await.unwrap_err();
    assert_eq!(err.code(), "RESOURCE_NOT_FOUND");
    assert_eq!(err.to_string(), "Question with id 999 not found");
}

#[tokio::test]
async fn test_delete_question_cascades_to_options() {
    let store = MemoryStore::new();

    let mut session = store.begin().await.unwrap();
    let result = QuestionService::new(&mut session)
        .create_question(choice("Pick", QuestionType::SingleChoice, 1, &["A", "B"]))
        .await;
    let created = finish(session, result).await.unwrap();
    let question_id = created.question.id;

    let mut session = store.begin().await.unwrap();
    let result = QuestionService::new(&mut session).delete_question(question_id).await;
    assert_eq!(finish(session, result).await.unwrap(), 1);

    let mut session = store.begin().await.unwrap();
    let options = Repository::<_, QuestionOption>::new(&mut session)
        .list_by(Filters::new().eq("question_id", question_id))
        .await
        .unwrap();
    assert!(options.is_empty());

    let err = QuestionService::new(&mut session)
        .delete_question(question_id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "RESOURCE_NOT_FOUND");
}

#[tokio::test]
async fn test_failed_creation_rolls_back() {
    let store = MemoryStore::new();
    let mut session = store.begin().await.unwrap();

    let result = async {
        let mut service = QuestionService::new(&mut session);
        service
            .create_question(choice("Kept?", QuestionType::OpenText, 1, &[]))
            .await?;
        service
            .create_question(choice("Broken", QuestionType::SingleChoice, 2, &["Only"]))
            .await
    }
    .await;

    assert!(finish(session, result).await.is_err());
    assert_eq!(store.count("questions").await, 0);
}

#[tokio::test]
async fn test_submit_answers_is_empty() {
    let store = MemoryStore::new();
    let mut session = store.begin().await.unwrap();
    let mut service = QuestionService::new(&mut session);

    let answers = vec![SubmittedAnswer {
        user_id: Uuid::new_v4(),
        question_id: 1,
        answer: json!({"kind": "open_text", "text": "hi"}),
    }];
    assert!(service.submit_answers(answers).await.unwrap().is_empty());
}
