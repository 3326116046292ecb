//! The contract between domain entities and the generic repository.

use std::fmt::Display;

use crate::errors::DomainResult;

use super::schema::{FieldValue, Record, TableSchema};

/// A persisted domain type
///
/// Implementors describe their table once through [`Entity::schema`] and
/// convert to and from a [`Record`]. The repository relies on the schema's
/// column list to validate every caller-supplied field name.
pub trait Entity: Sized + Clone + Send + Sync + 'static {
    /// Primary key type
    type Id: Into<FieldValue> + Clone + Display + Send + Sync;

    fn schema() -> &'static TableSchema;

    fn id(&self) -> Self::Id;

    fn to_record(&self) -> DomainResult<Record>;

    fn from_record(record: Record) -> DomainResult<Self>;
}
