//! Table descriptions and the dynamically-typed row representation shared by
//! every store implementation.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult};

/// Storage type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Uuid,
    /// 32-bit integer
    Int4,
    /// 64-bit integer
    Int8,
    Text,
    Bool,
    Timestamp,
    Json,
}

impl ColumnKind {
    pub fn name(&self) -> &'static str {
        match self {
            ColumnKind::Uuid => "uuid",
            ColumnKind::Int4 | ColumnKind::Int8 => "integer",
            ColumnKind::Text => "text",
            ColumnKind::Bool => "boolean",
            ColumnKind::Timestamp => "timestamp",
            ColumnKind::Json => "json",
        }
    }

    /// Convert a loosely-typed value (typically decoded from a JSON request)
    /// into the representation this column stores.
    pub fn coerce(&self, column: &str, value: FieldValue) -> DomainResult<FieldValue> {
        let mismatch = |value: &FieldValue| {
            let mut details = serde_json::Map::new();
            details.insert("field".to_string(), Value::from(column));
            details.insert("expected".to_string(), Value::from(self.name()));
            DomainError::validation_with(
                format!(
                    "Value {} is not a valid {} for field '{}'",
                    value,
                    self.name(),
                    column
                ),
                details,
            )
        };

        let value = match value {
            FieldValue::Json(json) if *self != ColumnKind::Json => FieldValue::from_json(json),
            other => other,
        };

        match (self, value) {
            (_, FieldValue::Null) => Ok(FieldValue::Null),
            (ColumnKind::Json, value) => Ok(FieldValue::Json(value.into_json())),
            (ColumnKind::Uuid, FieldValue::Uuid(u)) => Ok(FieldValue::Uuid(u)),
            (ColumnKind::Uuid, FieldValue::Text(s)) => Uuid::parse_str(&s)
                .map(FieldValue::Uuid)
                .map_err(|_| mismatch(&FieldValue::Text(s))),
            (ColumnKind::Int4, FieldValue::Int(i)) => i32::try_from(i)
                .map(|_| FieldValue::Int(i))
                .map_err(|_| mismatch(&FieldValue::Int(i))),
            (ColumnKind::Int8, FieldValue::Int(i)) => Ok(FieldValue::Int(i)),
            (ColumnKind::Int4 | ColumnKind::Int8, FieldValue::Text(s)) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| mismatch(&FieldValue::Text(s.clone())))
                .and_then(|i| self.coerce(column, FieldValue::Int(i))),
            (ColumnKind::Text, FieldValue::Text(s)) => Ok(FieldValue::Text(s)),
            (ColumnKind::Bool, FieldValue::Bool(b)) => Ok(FieldValue::Bool(b)),
            (ColumnKind::Timestamp, FieldValue::Timestamp(t)) => Ok(FieldValue::Timestamp(t)),
            (ColumnKind::Timestamp, FieldValue::Text(s)) => DateTime::parse_from_rfc3339(&s)
                .map(|t| FieldValue::Timestamp(t.with_timezone(&Utc)))
                .map_err(|_| mismatch(&FieldValue::Text(s))),
            (_, other) => Err(mismatch(&other)),
        }
    }
}

/// Column description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub nullable: bool,
    /// Parent table whose primary key this column references (`ON DELETE CASCADE`)
    pub references: Option<&'static str>,
}

impl Column {
    pub const fn new(name: &'static str, kind: ColumnKind) -> Self {
        Self {
            name,
            kind,
            nullable: false,
            references: None,
        }
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub const fn references(mut self, table: &'static str) -> Self {
        self.references = Some(table);
        self
    }
}

/// How primary keys are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyGeneration {
    /// The caller supplies the key (UUIDs generated in the domain)
    Supplied,
    /// The store assigns the next value of a sequence
    Serial,
}

/// Static description of a persisted entity
#[derive(Debug)]
pub struct TableSchema {
    /// Table name
    pub table: &'static str,
    /// Display name used in error messages
    pub entity: &'static str,
    pub primary_key: &'static str,
    pub key_generation: KeyGeneration,
    /// Every column, primary key included; the allow-list for filters and sorting
    pub columns: &'static [Column],
}

impl TableSchema {
    pub fn column(&self, name: &str) -> Option<&'static Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Resolve a caller-supplied field name, failing with `InvalidField`
    pub fn resolve(&self, name: &str) -> DomainResult<&'static Column> {
        self.column(name)
            .ok_or_else(|| DomainError::invalid_field(name, &self.column_names()))
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    pub fn primary_key_column(&self) -> DomainResult<&'static Column> {
        self.column(self.primary_key).ok_or_else(|| {
            DomainError::internal(format!(
                "Table '{}' does not declare its primary key column",
                self.table
            ))
        })
    }

    /// Columns referencing `parent` with cascading deletes
    pub fn references_to<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = &'static Column> + 'a {
        self.columns
            .iter()
            .filter(move |c| c.references == Some(parent))
    }
}

/// Dynamically-typed column value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    Json(Value),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Map a JSON scalar onto the closest typed value
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Int(i),
                None => FieldValue::Json(Value::Number(n)),
            },
            Value::String(s) => FieldValue::Text(s),
            other => FieldValue::Json(other),
        }
    }

    pub fn into_json(self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(b),
            FieldValue::Int(i) => Value::from(i),
            FieldValue::Text(s) => Value::String(s),
            FieldValue::Uuid(u) => Value::String(u.to_string()),
            FieldValue::Timestamp(t) => Value::String(t.to_rfc3339()),
            FieldValue::Json(v) => v,
        }
    }

    /// Ordering between values of the same type; `None` when incomparable
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::Bool(a), FieldValue::Bool(b)) => Some(a.cmp(b)),
            (FieldValue::Int(a), FieldValue::Int(b)) => Some(a.cmp(b)),
            (FieldValue::Text(a), FieldValue::Text(b)) => Some(a.cmp(b)),
            (FieldValue::Uuid(a), FieldValue::Uuid(b)) => Some(a.cmp(b)),
            (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => Some(a.cmp(b)),
            (FieldValue::Json(a), FieldValue::Json(b)) if a == b => Some(Ordering::Equal),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Null => f.write_str("null"),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Text(s) => write!(f, "'{}'", s),
            FieldValue::Uuid(u) => write!(f, "{}", u),
            FieldValue::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
            FieldValue::Json(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(i64::from(value))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<Uuid> for FieldValue {
    fn from(value: Uuid) -> Self {
        FieldValue::Uuid(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(value)
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::Json(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

/// Conversion out of a [`FieldValue`] when rebuilding an entity
pub trait FromField: Sized {
    fn from_field(value: FieldValue) -> Option<Self>;
}

impl FromField for bool {
    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Bool(b) => Some(b),
            _ => None,
        }
    }
}

impl FromField for i64 {
    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Int(i) => Some(i),
            _ => None,
        }
    }
}

impl FromField for i32 {
    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Int(i) => i32::try_from(i).ok(),
            _ => None,
        }
    }
}

impl FromField for String {
    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl FromField for Uuid {
    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Uuid(u) => Some(u),
            _ => None,
        }
    }
}

impl FromField for DateTime<Utc> {
    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Timestamp(t) => Some(t),
            _ => None,
        }
    }
}

impl FromField for Value {
    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Json(v) => Some(v),
            _ => None,
        }
    }
}

/// One row keyed by column name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    values: BTreeMap<&'static str, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: &'static str, value: impl Into<FieldValue>) -> &mut Self {
        self.values.insert(column, value.into());
        self
    }

    pub fn with(mut self, column: &'static str, value: impl Into<FieldValue>) -> Self {
        self.set(column, value);
        self
    }

    /// Store a serializable value as JSON
    pub fn set_json<T: Serialize>(&mut self, column: &'static str, value: &T) -> DomainResult<&mut Self> {
        let json = serde_json::to_value(value).map_err(|e| {
            DomainError::internal(format!("Failed to encode column '{}': {}", column, e))
        })?;
        Ok(self.set(column, FieldValue::Json(json)))
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.values.get(column)
    }

    pub fn remove(&mut self, column: &str) -> Option<FieldValue> {
        self.values.remove(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Remove and convert a required column
    pub fn take<T: FromField>(&mut self, column: &str) -> DomainResult<T> {
        let value = self.values.remove(column).ok_or_else(|| {
            DomainError::internal(format!("Column '{}' missing from row", column))
        })?;
        let shown = value.to_string();
        T::from_field(value).ok_or_else(|| {
            DomainError::internal(format!(
                "Column '{}' holds an unexpected value {}",
                column, shown
            ))
        })
    }

    /// Remove and convert a nullable column
    pub fn take_opt<T: FromField>(&mut self, column: &str) -> DomainResult<Option<T>> {
        match self.values.get(column) {
            None | Some(FieldValue::Null) => {
                self.values.remove(column);
                Ok(None)
            }
            Some(_) => self.take(column).map(Some),
        }
    }

    /// Remove and decode a JSON column, `None` when SQL NULL
    pub fn take_json<T: DeserializeOwned>(&mut self, column: &str) -> DomainResult<Option<T>> {
        match self.take_opt::<Value>(column)? {
            None => Ok(None),
            Some(json) => serde_json::from_value(json).map(Some).map_err(|e| {
                DomainError::internal(format!("Failed to decode column '{}': {}", column, e))
            }),
        }
    }
}

impl IntoIterator for Record {
    type Item = (&'static str, FieldValue);
    type IntoIter = std::collections::btree_map::IntoIter<&'static str, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
