//! Application factory
//!
//! Builds the actix-web application around any [`Store`], so the server runs
//! on PostgreSQL while tests run on the in-memory store.

use actix_web::body::BoxBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App};
use tracing_actix_web::TracingLogger;

use sv_core::repositories::Store;

use crate::handlers::{json_error_handler, not_found, path_error_handler};
use crate::middleware::RequestContextMiddleware;
use crate::routes::{self, AppState};

/// Create the application with all routes and middleware
pub fn create_app<S: Store>(
    app_state: web::Data<AppState<S>>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<BoxBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let payload_limit = app_state.config.server.max_payload_size;

    App::new()
        .app_data(app_state)
        .app_data(
            web::JsonConfig::default()
                .limit(payload_limit)
                .error_handler(json_error_handler),
        )
        .app_data(web::PayloadConfig::new(payload_limit))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        // Outermost last: the request context sees every response, panics included
        .wrap(TracingLogger::default())
        .wrap(RequestContextMiddleware)
        .configure(routes::configure::<S>)
        .default_service(web::route().to(not_found))
}
