//! User routes

use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use sv_core::repositories::{finish, Store};
use sv_core::services::UserService;

use crate::dto::{parse_optional_body, ListRequest, UserCreateRequest, UserRead};
use crate::handlers::{validation_failed, ApiError, InRequest};

use super::AppState;

/// POST /user/create
///
/// Responds 201 with `{id, name, email}`.
pub async fn create_user<S: Store>(
    req: HttpRequest,
    state: web::Data<AppState<S>>,
    payload: web::Json<UserCreateRequest>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    payload
        .validate()
        .map_err(|e| validation_failed(&e))
        .in_request(&req)?;

    tracing::info!(email = %payload.email, "Creating user");
    let mut session = state.store.begin().await.in_request(&req)?;
    let result = UserService::new(&mut session)
        .create_user(payload.into())
        .await;
    let user = finish(session, result).await.in_request(&req)?;

    tracing::info!(user_id = %user.id, "User created");
    Ok(HttpResponse::Created().json(UserRead::from(user)))
}

/// POST|GET /user/list, GET /list
///
/// Without a body every user is listed newest first. A body of
/// `{filters, sort_by, sort_order, limit}` narrows the list.
pub async fn list_users<S: Store>(
    req: HttpRequest,
    state: web::Data<AppState<S>>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let query = parse_optional_body::<ListRequest>(&body)
        .and_then(|request| request.map(ListRequest::into_query).transpose())
        .in_request(&req)?;

    let mut session = state.store.begin().await.in_request(&req)?;
    let mut service = UserService::new(&mut session);
    let result = match query {
        Some(query) => service.search_users(query).await,
        None => service.list_users().await,
    };
    let users = finish(session, result).await.in_request(&req)?;

    tracing::info!(count = users.len(), "Users listed");
    let body: Vec<UserRead> = users.into_iter().map(UserRead::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /user/{id}
pub async fn get_user<S: Store>(
    req: HttpRequest,
    state: web::Data<AppState<S>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let mut session = state.store.begin().await.in_request(&req)?;
    let result = UserService::new(&mut session).get_user(id).await;
    let user = finish(session, result).await.in_request(&req)?;

    Ok(HttpResponse::Ok().json(UserRead::from(user)))
}
