//! Conversions between typed column values and PostgreSQL binds and rows.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::{PgRow, Postgres};
use sqlx::{QueryBuilder, Row};
use uuid::Uuid;

use sv_core::errors::{DomainError, DomainResult};
use sv_core::repositories::{Column, ColumnKind, FieldValue, Record, TableSchema};

use crate::DATABASE_FAILURE_MESSAGE;

/// PostgreSQL SQLSTATE for unique constraint violations
const UNIQUE_VIOLATION: &str = "23505";

/// Double-quoted identifier; names always come from a static schema
pub(crate) fn ident(name: &str) -> String {
    format!("\"{}\"", name)
}

/// Bind `value` with the Rust type matching the column, so NULLs are typed too
pub(crate) fn push_value<'a>(
    qb: &mut QueryBuilder<'a, Postgres>,
    column: &Column,
    value: &FieldValue,
) -> DomainResult<()> {
    match (column.kind, value) {
        (ColumnKind::Uuid, FieldValue::Null) => qb.push_bind(None::<Uuid>),
        (ColumnKind::Uuid, FieldValue::Uuid(u)) => qb.push_bind(*u),
        (ColumnKind::Int4, FieldValue::Null) => qb.push_bind(None::<i32>),
        (ColumnKind::Int4, FieldValue::Int(i)) => {
            let narrowed = i32::try_from(*i).map_err(|_| mismatch(column, value))?;
            qb.push_bind(narrowed)
        }
        (ColumnKind::Int8, FieldValue::Null) => qb.push_bind(None::<i64>),
        (ColumnKind::Int8, FieldValue::Int(i)) => qb.push_bind(*i),
        (ColumnKind::Text, FieldValue::Null) => qb.push_bind(None::<String>),
        (ColumnKind::Text, FieldValue::Text(s)) => qb.push_bind(s.clone()),
        (ColumnKind::Bool, FieldValue::Null) => qb.push_bind(None::<bool>),
        (ColumnKind::Bool, FieldValue::Bool(b)) => qb.push_bind(*b),
        (ColumnKind::Timestamp, FieldValue::Null) => qb.push_bind(None::<DateTime<Utc>>),
        (ColumnKind::Timestamp, FieldValue::Timestamp(t)) => qb.push_bind(*t),
        (ColumnKind::Json, FieldValue::Null) => qb.push_bind(None::<Value>),
        (ColumnKind::Json, other) => qb.push_bind(other.clone().into_json()),
        _ => return Err(mismatch(column, value)),
    };
    Ok(())
}

fn mismatch(column: &Column, value: &FieldValue) -> DomainError {
    DomainError::internal(format!(
        "Value {} cannot be stored in {} column '{}'",
        value,
        column.kind.name(),
        column.name
    ))
}

/// Rebuild a record from a row selected with every schema column
pub(crate) fn decode_row(schema: &TableSchema, row: &PgRow) -> DomainResult<Record> {
    let mut record = Record::new();
    for column in schema.columns {
        let name = column.name;
        let value = match column.kind {
            ColumnKind::Uuid => row.try_get::<Option<Uuid>, _>(name).map(FieldValue::from),
            ColumnKind::Int4 => row.try_get::<Option<i32>, _>(name).map(FieldValue::from),
            ColumnKind::Int8 => row.try_get::<Option<i64>, _>(name).map(FieldValue::from),
            ColumnKind::Text => row.try_get::<Option<String>, _>(name).map(FieldValue::from),
            ColumnKind::Bool => row.try_get::<Option<bool>, _>(name).map(FieldValue::from),
            ColumnKind::Timestamp => row
                .try_get::<Option<DateTime<Utc>>, _>(name)
                .map(FieldValue::from),
            ColumnKind::Json => row.try_get::<Option<Value>, _>(name).map(FieldValue::from),
        }
        .map_err(|e| {
            DomainError::internal(format!("Failed to decode column '{}': {}", name, e))
        })?;
        record.set(name, value);
    }
    Ok(record)
}

/// Wrap a driver error for the session boundary
///
/// Unique violations become `DuplicateResource` naming `resource`; everything
/// else is a `Database` error tagged with the failing operation.
pub(crate) fn map_error(
    err: sqlx::Error,
    schema: &TableSchema,
    operation: &str,
    resource: Option<String>,
) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let name = resource
                .or_else(|| db_err.constraint().map(str::to_string))
                .unwrap_or_else(|| schema.table.to_string());
            return DomainError::duplicate(schema.entity, name);
        }
    }

    tracing::error!(
        error = %err,
        table = schema.table,
        operation,
        "Database operation failed"
    );
    DomainError::database(DATABASE_FAILURE_MESSAGE, Some(operation))
}
