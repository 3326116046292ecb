//! Question request and response bodies

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use sv_core::domain::entities::{QuestionOption, QuestionType, QuestionWithOptions};
use sv_core::services::{CreateQuestion, SubmittedAnswer};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionCreate {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuestionCreateRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub que_order: i32,
    /// For single and multiple choice questions
    pub options: Option<Vec<OptionCreate>>,
    /// For matrix questions
    pub matrix_rows: Option<Vec<String>>,
    pub matrix_cols: Option<Vec<String>>,
}

impl From<QuestionCreateRequest> for CreateQuestion {
    fn from(request: QuestionCreateRequest) -> Self {
        CreateQuestion {
            text: request.text,
            question_type: request.question_type,
            que_order: request.que_order,
            options: request
                .options
                .unwrap_or_default()
                .into_iter()
                .map(|option| option.text)
                .collect(),
            matrix_rows: request.matrix_rows,
            matrix_cols: request.matrix_cols,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionRead {
    pub id: i64,
    pub text: String,
}

impl From<QuestionOption> for OptionRead {
    fn from(option: QuestionOption) -> Self {
        Self {
            id: option.id,
            text: option.text,
        }
    }
}

/// Public view of a question; lists a question does not carry are omitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRead {
    pub id: i64,
    pub que_order: i32,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<OptionRead>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix_rows: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix_cols: Option<Vec<String>>,
}

impl From<QuestionWithOptions> for QuestionRead {
    fn from(composite: QuestionWithOptions) -> Self {
        let QuestionWithOptions { question, options } = composite;
        let options = if options.is_empty() && !question.question_type.is_choice() {
            None
        } else {
            Some(options.into_iter().map(OptionRead::from).collect())
        };

        Self {
            id: question.id,
            que_order: question.que_order,
            text: question.text,
            question_type: question.question_type,
            options,
            matrix_rows: question.matrix_rows,
            matrix_cols: question.matrix_cols,
        }
    }
}

/// One answer in a submission body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub user_id: Uuid,
    pub question_id: i64,
    pub answer: serde_json::Value,
}

impl From<AnswerRequest> for SubmittedAnswer {
    fn from(request: AnswerRequest) -> Self {
        SubmittedAnswer {
            user_id: request.user_id,
            question_id: request.question_id,
            answer: request.answer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sv_core::domain::entities::Question;

    #[test]
    fn test_create_request_reads_option_objects() {
        let request: QuestionCreateRequest = serde_json::from_value(json!({
            "text": "Pick one",
            "type": "single_choice",
            "que_order": 1,
            "options": [{"text": "A"}, {"text": "B"}]
        }))
        .unwrap();

        let input = CreateQuestion::from(request);
        assert_eq!(input.options, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(input.question_type, QuestionType::SingleChoice);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let parsed = serde_json::from_value::<QuestionCreateRequest>(json!({
            "text": "Rate us",
            "type": "slider",
            "que_order": 1
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_open_text_read_omits_lists() {
        let mut question = Question::new("Why?", QuestionType::OpenText, 3);
        question.id = 7;
        let read = QuestionRead::from(QuestionWithOptions {
            question,
            options: Vec::new(),
        });

        let body = serde_json::to_value(&read).unwrap();
        assert_eq!(body, json!({"id": 7, "que_order": 3, "text": "Why?", "type": "open_text"}));
    }

    #[test]
    fn test_matrix_read_carries_labels() {
        let question = Question::new("Rate", QuestionType::MatrixOne, 1)
            .with_matrix(Some(vec!["Speed".into()]), Some(vec!["Good".into(), "Bad".into()]));
        let read = QuestionRead::from(QuestionWithOptions {
            question,
            options: Vec::new(),
        });

        let body = serde_json::to_value(&read).unwrap();
        assert_eq!(body["type"], "matrix_one");
        assert_eq!(body["matrix_cols"], json!(["Good", "Bad"]));
        assert!(body.get("options").is_none());
    }
}
