//! Question service implementation

use serde_json::{json, Map};
use sv_shared::SortOrder;

use crate::domain::entities::answer::UserAnswer;
use crate::domain::entities::question::{
    Question, QuestionOption, QuestionWithOptions, MIN_CHOICE_OPTIONS,
};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{ListQuery, Repository, Session};

use super::types::{CreateQuestion, SubmittedAnswer};

/// Question operations over one request's session
pub struct QuestionService<'s, S: Session> {
    session: &'s mut S,
}

impl<'s, S: Session> QuestionService<'s, S> {
    pub fn new(session: &'s mut S) -> Self {
        Self { session }
    }

    fn questions(&mut self) -> Repository<'_, S, Question> {
        Repository::new(self.session)
    }

    fn options(&mut self) -> Repository<'_, S, QuestionOption> {
        Repository::new(self.session)
    }

    /// Create a question and its options in the current session
    ///
    /// Single and multiple choice questions need at least
    /// [`MIN_CHOICE_OPTIONS`] options.
    pub async fn create_question(&mut self, input: CreateQuestion) -> DomainResult<QuestionWithOptions> {
        tracing::info!(text = %input.text, question_type = %input.question_type, "Creating question");

        if input.question_type.is_choice() && input.options.len() < MIN_CHOICE_OPTIONS {
            let mut details = Map::new();
            details.insert("type".to_string(), json!(input.question_type.as_str()));
            details.insert("option_count".to_string(), json!(input.options.len()));
            details.insert("min_options".to_string(), json!(MIN_CHOICE_OPTIONS));
            return Err(DomainError::validation_with(
                "At least two options are required for choice questions.",
                details,
            ));
        }

        let question = Question::new(input.text, input.question_type, input.que_order)
            .with_matrix(input.matrix_rows, input.matrix_cols);
        let question = self.questions().add(&question).await?;

        let mut options = Vec::with_capacity(input.options.len());
        for text in input.options {
            let option = QuestionOption::new(question.id, text);
            options.push(self.options().add(&option).await?);
        }

        tracing::info!(question_id = question.id, options = options.len(), "Question created");
        Ok(QuestionWithOptions { question, options })
    }

    /// Every non-deleted question with its options, by `que_order` then id
    pub async fn list_questions(&mut self) -> DomainResult<Vec<QuestionWithOptions>> {
        tracing::info!("Listing all questions");

        let query = ListQuery::new()
            .eq("is_deleted", false)
            .sort("que_order", SortOrder::Asc);
        let questions = self.questions().find(&query).await?;

        let mut listed = Vec::with_capacity(questions.len());
        for question in questions {
            let options = self.options_of(question.id).await?;
            listed.push(QuestionWithOptions { question, options });
        }

        tracing::info!(count = listed.len(), "Questions found");
        Ok(listed)
    }

    /// Fetch one question with its options
    pub async fn get_question(&mut self, id: i64) -> DomainResult<QuestionWithOptions> {
        let question = match self.questions().get_by_id(id).await? {
            Some(question) if !question.audit.is_deleted => question,
            _ => return Err(DomainError::not_found("Question", id)),
        };
        let options = self.options_of(question.id).await?;
        Ok(QuestionWithOptions { question, options })
    }

    /// Physically delete a question; options and answers go with it
    pub async fn delete_question(&mut self, id: i64) -> DomainResult<u64> {
        let removed = self.questions().delete_by_id(id).await?;
        if removed == 0 {
            return Err(DomainError::not_found("Question", id));
        }
        tracing::info!(question_id = id, "Question deleted");
        Ok(removed)
    }

    /// Accept submitted answers
    ///
    /// Answers are not recorded yet; the result is always empty.
    pub async fn submit_answers(&mut self, answers: Vec<SubmittedAnswer>) -> DomainResult<Vec<UserAnswer>> {
        tracing::info!(count = answers.len(), "Submitting user answers");
        Ok(Vec::new())
    }

    async fn options_of(&mut self, question_id: i64) -> DomainResult<Vec<QuestionOption>> {
        let query = ListQuery::new()
            .eq("question_id", question_id)
            .eq("is_deleted", false)
            .sort("id", SortOrder::Asc);
        self.options().find(&query).await
    }
}
