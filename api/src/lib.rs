//! HTTP surface of the Surveyor backend
//!
//! - `app` - application factory
//! - `routes` - user, question and health handlers
//! - `dto` - request and response bodies
//! - `handlers` - error responder
//! - `middleware` - request context
//! - `telemetry` - tracing setup

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::create_app;
pub use routes::AppState;
