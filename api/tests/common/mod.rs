//! Helpers shared by the HTTP tests

#![allow(dead_code)]

use actix_web::web;
use serde_json::{json, Value};

use sv_api::AppState;
use sv_core::repositories::{Entity, ListQuery, MemoryStore, Repository, Store};
use sv_shared::AppConfig;

pub fn state(store: &MemoryStore) -> web::Data<AppState<MemoryStore>> {
    state_with_config(store, AppConfig::default())
}

pub fn state_with_config(store: &MemoryStore, config: AppConfig) -> web::Data<AppState<MemoryStore>> {
    web::Data::new(AppState::new(store.clone(), config))
}

pub fn user_payload(name: &str, email: &str) -> Value {
    json!({
        "name": name,
        "email": email,
        "domain": "example.com",
        "username": "testuser",
        "status": "active"
    })
}

pub fn choice_question(text: &str, order: i32, options: &[&str]) -> Value {
    let options: Vec<Value> = options.iter().map(|text| json!({ "text": text })).collect();
    json!({
        "text": text,
        "type": "single_choice",
        "que_order": order,
        "options": options
    })
}

/// Committed rows of entity `E`
pub async fn count<E: Entity>(store: &MemoryStore) -> usize {
    let mut session = store.begin().await.unwrap();
    let rows: Vec<E> = Repository::new(&mut session)
        .find(&ListQuery::new())
        .await
        .unwrap();
    rows.len()
}
