use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;

use sv_core::repositories::Store;
use sv_shared::ApiResponse;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: String,
}

/// GET /health
pub async fn health<S: Store>(req: HttpRequest, state: web::Data<AppState<S>>) -> HttpResponse {
    let status = HealthStatus {
        status: "healthy",
        version: state.config.app.version.clone(),
    };
    HttpResponse::Ok().json(ApiResponse::success(status, "Service is healthy").with_path(req.path()))
}
