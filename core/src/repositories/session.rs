//! Unit-of-work abstraction implemented by every backing store.

use async_trait::async_trait;

use crate::errors::DomainResult;

use super::query::Selection;
use super::schema::{FieldValue, Record, TableSchema};

/// Factory for per-request sessions
#[async_trait]
pub trait Store: Send + Sync + 'static {
    type Session: Session;

    /// Open a new unit of work
    async fn begin(&self) -> DomainResult<Self::Session>;
}

/// A single unit of work against the store
///
/// Changes become visible to other sessions only after [`Session::commit`].
/// Dropping a session without committing discards its changes.
#[async_trait]
pub trait Session: Send {
    /// Insert a row and return it as stored, with generated columns filled in
    async fn insert(&mut self, schema: &'static TableSchema, record: Record) -> DomainResult<Record>;

    /// Fetch rows matching a validated selection
    async fn select(
        &mut self,
        schema: &'static TableSchema,
        selection: &Selection,
    ) -> DomainResult<Vec<Record>>;

    /// Apply `changes` to the row with primary key `key`; returns affected rows
    async fn update(
        &mut self,
        schema: &'static TableSchema,
        key: FieldValue,
        changes: Record,
    ) -> DomainResult<u64>;

    /// Remove the row with primary key `key`, cascading to dependent rows;
    /// returns affected rows of `schema` only
    async fn delete(&mut self, schema: &'static TableSchema, key: FieldValue) -> DomainResult<u64>;

    async fn commit(self) -> DomainResult<()>;

    async fn rollback(self) -> DomainResult<()>;
}

/// Commit on success, roll back on failure, and hand the result back
pub async fn finish<S: Session, T>(session: S, result: DomainResult<T>) -> DomainResult<T> {
    match result {
        Ok(value) => {
            session.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = session.rollback().await {
                tracing::error!(
                    error = %rollback_err,
                    original_error = %err,
                    "Failed to roll back session"
                );
            }
            Err(err)
        }
    }
}
