//! Question routes

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;
use validator::Validate;

use sv_core::repositories::{finish, Store};
use sv_core::services::{QuestionService, SubmittedAnswer};

use crate::dto::{parse_optional_body, AnswerRequest, QuestionCreateRequest, QuestionRead};
use crate::handlers::{validation_failed, ApiError, InRequest};

use super::AppState;

/// POST /question/create
pub async fn create_question<S: Store>(
    req: HttpRequest,
    state: web::Data<AppState<S>>,
    payload: web::Json<QuestionCreateRequest>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    payload
        .validate()
        .map_err(|e| validation_failed(&e))
        .in_request(&req)?;

    let mut session = state.store.begin().await.in_request(&req)?;
    let result = QuestionService::new(&mut session)
        .create_question(payload.into())
        .await;
    let created = finish(session, result).await.in_request(&req)?;

    Ok(HttpResponse::Created().json(QuestionRead::from(created)))
}

/// POST|GET /question/list
pub async fn list_questions<S: Store>(
    req: HttpRequest,
    state: web::Data<AppState<S>>,
) -> Result<HttpResponse, ApiError> {
    let mut session = state.store.begin().await.in_request(&req)?;
    let result = QuestionService::new(&mut session).list_questions().await;
    let questions = finish(session, result).await.in_request(&req)?;

    let body: Vec<QuestionRead> = questions.into_iter().map(QuestionRead::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /question/{id}
pub async fn get_question<S: Store>(
    req: HttpRequest,
    state: web::Data<AppState<S>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let mut session = state.store.begin().await.in_request(&req)?;
    let result = QuestionService::new(&mut session).get_question(id).await;
    let question = finish(session, result).await.in_request(&req)?;

    Ok(HttpResponse::Ok().json(QuestionRead::from(question)))
}

/// DELETE /question/{id}
///
/// Options and answers of the question are removed with it.
pub async fn delete_question<S: Store>(
    req: HttpRequest,
    state: web::Data<AppState<S>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let mut session = state.store.begin().await.in_request(&req)?;
    let result = QuestionService::new(&mut session).delete_question(id).await;
    let deleted = finish(session, result).await.in_request(&req)?;

    Ok(HttpResponse::Ok().json(json!({ "deleted": deleted })))
}

/// POST /question/submit
///
/// Accepts an optional array of answers; responds with the question list.
pub async fn submit_answers<S: Store>(
    req: HttpRequest,
    state: web::Data<AppState<S>>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let answers: Vec<SubmittedAnswer> = parse_optional_body::<Vec<AnswerRequest>>(&body)
        .in_request(&req)?
        .unwrap_or_default()
        .into_iter()
        .map(SubmittedAnswer::from)
        .collect();

    let mut session = state.store.begin().await.in_request(&req)?;
    let mut service = QuestionService::new(&mut session);
    let result = match service.submit_answers(answers).await {
        Ok(_) => service.list_questions().await,
        Err(err) => Err(err),
    };
    let questions = finish(session, result).await.in_request(&req)?;

    let body: Vec<QuestionRead> = questions.into_iter().map(QuestionRead::from).collect();
    Ok(HttpResponse::Ok().json(body))
}
