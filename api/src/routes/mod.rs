//! Route handlers
//!
//! - `user` - user profiles
//! - `question` - questions, options and answer submission
//! - `health` - liveness

pub mod health;
pub mod question;
pub mod user;

use actix_web::web;

use sv_core::repositories::Store;
use sv_shared::AppConfig;

/// State shared by every handler
pub struct AppState<S: Store> {
    pub store: S,
    pub config: AppConfig,
}

impl<S: Store> AppState<S> {
    pub fn new(store: S, config: AppConfig) -> Self {
        Self { store, config }
    }
}

/// Register every route against the store type `S`
pub fn configure<S: Store>(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health::<S>))
        .route("/list", web::get().to(user::list_users::<S>))
        .service(
            web::scope("/user")
                .route("/create", web::post().to(user::create_user::<S>))
                .route("/list", web::post().to(user::list_users::<S>))
                .route("/list", web::get().to(user::list_users::<S>))
                .route("/{id}", web::get().to(user::get_user::<S>)),
        )
        .service(
            web::scope("/question")
                .route("/create", web::post().to(question::create_question::<S>))
                .route("/list", web::post().to(question::list_questions::<S>))
                .route("/list", web::get().to(question::list_questions::<S>))
                .route("/submit", web::post().to(question::submit_answers::<S>))
                .route("/{id}", web::get().to(question::get_question::<S>))
                .route("/{id}", web::delete().to(question::delete_question::<S>)),
        );
}
