//! Tests for list query validation

use sv_shared::SortOrder;

use crate::domain::entities::{QUESTIONS, USERS_PROFILE};
use crate::repositories::{parse_sort_order, FieldValue, ListQuery, Operator};

#[test]
fn test_operator_parse_is_case_insensitive() {
    assert_eq!("GTE".parse::<Operator>().unwrap(), Operator::Gte);
    assert_eq!(" contains ".parse::<Operator>().unwrap(), Operator::Contains);
    assert_eq!(Operator::default(), Operator::Eq);
}

#[test]
fn test_unknown_operator() {
    let err = "like".parse::<Operator>().unwrap_err();
    assert_eq!(err.code(), "INVALID_OPERATOR");
    assert_eq!(
        err.to_string(),
        "Invalid operator 'like'. Supported operators: eq, ne, gt, gte, lt, lte, contains"
    );
}

#[test]
fn test_parse_sort_order() {
    assert_eq!(parse_sort_order("Asc").unwrap(), SortOrder::Asc);
    let err = parse_sort_order("upwards").unwrap_err();
    assert_eq!(err.code(), "INVALID_SORT_ORDER");
    assert_eq!(err.details()["sort_order"], "upwards");
}

#[test]
fn test_default_ordering_is_newest_first_with_key_tiebreak() {
    let selection = ListQuery::new().compile(&USERS_PROFILE).unwrap();

    let order: Vec<(&str, SortOrder)> = selection
        .order_by
        .iter()
        .map(|(column, order)| (column.name, *order))
        .collect();
    assert_eq!(order, vec![("created_at", SortOrder::Desc), ("id", SortOrder::Desc)]);
    assert!(selection.conditions.is_empty());
    assert!(selection.limit.is_none());
}

#[test]
fn test_sorting_by_primary_key_has_no_tiebreak() {
    let selection = ListQuery::new()
        .sort("id", SortOrder::Asc)
        .compile(&QUESTIONS)
        .unwrap();
    assert_eq!(selection.order_by.len(), 1);
}

#[test]
fn test_unknown_filter_field() {
    let err = ListQuery::new()
        .eq("password", "secret")
        .compile(&USERS_PROFILE)
        .unwrap_err();

    assert_eq!(err.code(), "INVALID_FIELD");
    assert!(err.to_string().starts_with("Invalid field 'password'. Available fields: id, name"));
    let available = err.details()["available_fields"].as_array().unwrap().len();
    assert_eq!(available, USERS_PROFILE.columns.len());
}

#[test]
fn test_unknown_sort_field() {
    let err = ListQuery::new()
        .sort("age", SortOrder::Asc)
        .compile(&USERS_PROFILE)
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_FIELD");
}

#[test]
fn test_values_are_coerced_to_column_kind() {
    let selection = ListQuery::new()
        .eq("que_order", "7")
        .eq("is_deleted", false)
        .compile(&QUESTIONS)
        .unwrap();

    assert_eq!(selection.conditions[0].value, FieldValue::Int(7));
    assert_eq!(selection.conditions[1].value, FieldValue::Bool(false));
}

#[test]
fn test_uncoercible_value_is_a_validation_error() {
    let err = ListQuery::new()
        .eq("id", "not-a-uuid")
        .compile(&USERS_PROFILE)
        .unwrap_err();

    assert_eq!(err.code(), "VALIDATION_ERROR");
    assert_eq!(err.details()["field"], "id");
    assert_eq!(err.details()["expected"], "uuid");
}

#[test]
fn test_int4_range_is_checked() {
    let err = ListQuery::new()
        .eq("que_order", i64::from(i32::MAX) + 1)
        .compile(&QUESTIONS)
        .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
}

#[test]
fn test_contains_requires_text() {
    let err = ListQuery::new()
        .filter("que_order", Operator::Contains, 3_i64)
        .compile(&QUESTIONS)
        .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
    assert_eq!(err.details()["operator"], "contains");
}

#[test]
fn test_null_only_supports_equality() {
    assert!(ListQuery::new()
        .filter("matrix_rows", Operator::Ne, FieldValue::Null)
        .compile(&QUESTIONS)
        .is_ok());

    let err = ListQuery::new()
        .filter("que_order", Operator::Gt, FieldValue::Null)
        .compile(&QUESTIONS)
        .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
}

#[test]
fn test_json_columns_are_not_ordered() {
    let err = ListQuery::new()
        .filter("matrix_rows", Operator::Lt, serde_json::json!(["a"]))
        .compile(&QUESTIONS)
        .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
}
