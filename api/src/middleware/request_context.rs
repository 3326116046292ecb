//! Request context middleware
//!
//! Assigns every request an id (the inbound `X-Request-ID`, or a fresh UUID),
//! echoes it on the response and turns anything that escaped the handlers
//! into the standard error envelope.

use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::http::StatusCode;
use actix_web::{Error, HttpMessage, HttpRequest, HttpResponse, ResponseError};
use futures_util::future::{FutureExt, LocalBoxFuture};
use std::any::Any;
use std::fmt;
use std::future::{ready, Ready};
use std::panic::AssertUnwindSafe;
use std::rc::Rc;
use uuid::Uuid;

use crate::handlers::error::{invalid_input, unexpected_error, ApiError, UNEXPECTED_ERROR_MESSAGE};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request id stored in the request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Middleware installing the request context
pub struct RequestContextMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestContextMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestContextService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestContextService {
            service: Rc::new(service),
        }))
    }
}

pub struct RequestContextService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestContextService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        let request_id = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        req.extensions_mut().insert(RequestId(request_id.clone()));

        // Routing needs sole ownership of the request, so nothing here may
        // hold a copy of it while the inner service runs
        let path = req.path().to_string();
        let method = req.method().to_string();

        Box::pin(async move {
            let outcome = AssertUnwindSafe(async move { service.call(req).await })
                .catch_unwind()
                .await;

            let mut res = match outcome {
                Ok(Ok(res)) => wrap_foreign_failure(res.map_into_boxed_body(), &request_id),
                Ok(Err(err)) => {
                    if err.as_error::<ApiError>().is_some() {
                        return Err(err);
                    }
                    tracing::error!(
                        path = %path,
                        method = %method,
                        request_id = %request_id,
                        error = ?err,
                        "Unhandled error"
                    );
                    return Err(UnhandledFailure::new(request_id).into());
                }
                Err(panic) => {
                    tracing::error!(
                        path = %path,
                        method = %method,
                        request_id = %request_id,
                        panic = %panic_message(panic.as_ref()),
                        "Handler panicked"
                    );
                    return Err(UnhandledFailure::new(request_id).into());
                }
            };

            if let Ok(value) = HeaderValue::from_str(&request_id) {
                res.headers_mut()
                    .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
            }
            Ok(res)
        })
    }
}

/// Put error responses raised outside the domain into the error envelope
///
/// Server failures become the generic internal error. Client failures, such
/// as an oversized payload, become a validation error on the body.
fn wrap_foreign_failure(
    res: ServiceResponse<BoxBody>,
    request_id: &str,
) -> ServiceResponse<BoxBody> {
    let foreign = res
        .response()
        .error()
        .filter(|e| e.as_error::<ApiError>().is_none())
        .map(|e| (e.to_string(), format!("{:?}", e)));

    let Some((message, debug_detail)) = foreign else {
        return res;
    };

    if res.status().is_server_error() {
        tracing::error!(
            path = %res.request().path(),
            method = %res.request().method(),
            request_id,
            error = %debug_detail,
            "Unhandled error"
        );
        let (req, _) = res.into_parts();
        let body = unexpected_error(Some(request_id.to_string()));
        return ServiceResponse::new(req, HttpResponse::InternalServerError().json(body));
    }

    let (req, _) = res.into_parts();
    let error = ApiError::with_context(invalid_input([("body", message)]), &req);
    ServiceResponse::from_err(error, req)
}

/// Failure that escaped the handlers without a response of its own
#[derive(Debug)]
pub struct UnhandledFailure {
    request_id: String,
}

impl UnhandledFailure {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }
}

impl fmt::Display for UnhandledFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(UNEXPECTED_ERROR_MESSAGE)
    }
}

impl ResponseError for UnhandledFailure {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::InternalServerError();
        if let Ok(value) = HeaderValue::from_str(&self.request_id) {
            response.insert_header((HeaderName::from_static(REQUEST_ID_HEADER), value));
        }
        response.json(unexpected_error(Some(self.request_id.clone())))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Access to the id assigned by [`RequestContextMiddleware`]
pub trait RequestIdExt {
    fn request_id(&self) -> Option<String>;
}

impl RequestIdExt for ServiceRequest {
    fn request_id(&self) -> Option<String> {
        self.extensions().get::<RequestId>().map(|id| id.0.clone())
    }
}

impl RequestIdExt for HttpRequest {
    fn request_id(&self) -> Option<String> {
        self.extensions().get::<RequestId>().map(|id| id.0.clone())
    }
}
