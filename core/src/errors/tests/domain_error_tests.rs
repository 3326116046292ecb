//! Unit tests for domain error types

use serde_json::json;
use sv_shared::config::AppConfig;

use crate::errors::{DomainError, ErrorKind};

#[test]
fn test_kind_table() {
    let cases = [
        (DomainError::validation("bad"), "VALIDATION_ERROR", 400),
        (DomainError::duplicate("User", "alice"), "DUPLICATE_RESOURCE", 400),
        (DomainError::not_found("Question", 7), "RESOURCE_NOT_FOUND", 404),
        (DomainError::invalid_field("x", &["a"]), "INVALID_FIELD", 400),
        (DomainError::invalid_operator("like", &["eq"]), "INVALID_OPERATOR", 400),
        (DomainError::invalid_sort_order("up"), "INVALID_SORT_ORDER", 400),
        (DomainError::database("down", None), "DATABASE_ERROR", 500),
        (DomainError::unauthorized(None), "UNAUTHORIZED", 401),
        (DomainError::forbidden(None), "FORBIDDEN", 403),
        (DomainError::configuration("bad", None), "CONFIGURATION_ERROR", 500),
        (DomainError::internal("oops"), "INTERNAL_ERROR", 500),
    ];

    for (error, code, status) in cases {
        assert_eq!(error.code(), code, "code for {:?}", error);
        assert_eq!(error.status_code(), status, "status for {:?}", error);
    }
}

#[test]
fn test_messages_follow_templates() {
    assert_eq!(
        DomainError::duplicate("User", "alice").to_string(),
        "User 'alice' already exists"
    );
    assert_eq!(
        DomainError::not_found("Question", 42).to_string(),
        "Question with id 42 not found"
    );
    assert_eq!(
        DomainError::invalid_field("nickname", &["id", "name", "email"]).to_string(),
        "Invalid field 'nickname'. Available fields: id, name, email"
    );
    assert_eq!(
        DomainError::invalid_operator("like", &["eq", "ne"]).to_string(),
        "Invalid operator 'like'. Supported operators: eq, ne"
    );
    assert_eq!(
        DomainError::invalid_sort_order("sideways").to_string(),
        "Invalid sort order 'sideways'. Must be 'asc' or 'desc'"
    );
    assert_eq!(DomainError::unauthorized(None).to_string(), "Authentication required");
    assert_eq!(DomainError::forbidden(None).to_string(), "Access denied");
    assert_eq!(
        DomainError::forbidden(Some("Read only")).to_string(),
        "Read only"
    );
}

#[test]
fn test_details_per_kind() {
    let details = DomainError::invalid_field("nickname", &["id", "name"]).details();
    assert_eq!(details["field_name"], "nickname");
    assert_eq!(details["available_fields"], json!(["id", "name"]));

    let details = DomainError::not_found("User", "abc").details();
    assert_eq!(details["resource_type"], "User");
    assert_eq!(details["resource_id"], "abc");

    let details = DomainError::database("down", Some("insert")).details();
    assert_eq!(details["operation"], "insert");

    assert!(DomainError::database("down", None).details().is_empty());
    assert!(DomainError::internal("oops").details().is_empty());
    assert!(DomainError::unauthorized(None).details().is_empty());
}

#[test]
fn test_validation_details_are_passed_through() {
    let mut details = serde_json::Map::new();
    details.insert("min_options".to_string(), json!(2));
    let error = DomainError::validation_with("Not enough options", details);

    assert_eq!(error.kind(), ErrorKind::Validation);
    assert_eq!(error.details()["min_options"], 2);
}

#[test]
fn test_in_operation_only_rewrites_database_errors() {
    let error = DomainError::database("connection reset", Some("insert"))
        .in_operation("add", "Error adding User");
    assert_eq!(error.to_string(), "Error adding User: connection reset");
    assert_eq!(error.details()["operation"], "add");

    let error = DomainError::duplicate("User", "x").in_operation("add", "Error adding User");
    assert_eq!(error.kind(), ErrorKind::DuplicateResource);
}

#[test]
fn test_config_error_becomes_configuration_kind() {
    let mut vars = sv_shared::config::VarMap::new();
    vars.insert("DB_MAX_CONNECTIONS".to_string(), "0".to_string());
    let error: DomainError = AppConfig::from_vars(Some(vars)).unwrap_err().into();

    assert_eq!(error.kind(), ErrorKind::Configuration);
    assert_eq!(error.details()["config_key"], "DB_MAX_CONNECTIONS");
    assert!(error.kind().is_server_error());
}
