//! Generic repository providing CRUD over any [`Entity`].

use chrono::Utc;
use std::marker::PhantomData;

use crate::errors::DomainResult;

use super::entity::Entity;
use super::query::{Filters, ListQuery, Selection};
use super::schema::{KeyGeneration, Record};
use super::session::Session;

/// Typed view of one entity type over a borrowed session
///
/// All operations run inside the caller's session; nothing is committed here.
pub struct Repository<'s, S: Session, E: Entity> {
    session: &'s mut S,
    _entity: PhantomData<fn() -> E>,
}

impl<'s, S: Session, E: Entity> Repository<'s, S, E> {
    pub fn new(session: &'s mut S) -> Self {
        Self {
            session,
            _entity: PhantomData,
        }
    }

    /// Persist `entity` and return it with store-assigned fields populated
    pub async fn add(&mut self, entity: &E) -> DomainResult<E> {
        let schema = E::schema();
        let mut record = entity.to_record()?;
        if schema.key_generation == KeyGeneration::Serial {
            record.remove(schema.primary_key);
        }

        let stored = self
            .session
            .insert(schema, record)
            .await
            .map_err(|e| e.in_operation("add", format!("Error adding {}", schema.entity)))?;

        tracing::debug!(table = schema.table, "Added {}", schema.entity);
        E::from_record(stored)
    }

    /// Fetch by primary key; absence is not an error
    pub async fn get_by_id(&mut self, id: E::Id) -> DomainResult<Option<E>> {
        let schema = E::schema();
        let selection = Selection::by_column(schema.primary_key_column()?, id.into());

        let mut rows = self
            .session
            .select(schema, &selection)
            .await
            .map_err(|e| e.in_operation("get_by_id", format!("Error fetching {}", schema.entity)))?;

        rows.pop().map(E::from_record).transpose()
    }

    /// First entity (newest first) matching every filter
    pub async fn get_by(&mut self, filters: Filters) -> DomainResult<Option<E>> {
        let query = ListQuery::from(filters).limit(1);
        Ok(self.find(&query).await?.into_iter().next())
    }

    /// All entities matching every filter, newest first
    pub async fn list_by(&mut self, filters: Filters) -> DomainResult<Vec<E>> {
        self.find(&ListQuery::from(filters)).await
    }

    /// Entities matching an operator-based query
    ///
    /// Unknown fields fail with `InvalidField` before any store access.
    pub async fn find(&mut self, query: &ListQuery) -> DomainResult<Vec<E>> {
        let schema = E::schema();
        let selection = query.compile(schema)?;

        let rows = self
            .session
            .select(schema, &selection)
            .await
            .map_err(|e| e.in_operation("list", format!("Error listing {}", schema.entity)))?;

        rows.into_iter().map(E::from_record).collect()
    }

    /// Physically remove by primary key; returns the number of removed rows
    pub async fn delete_by_id(&mut self, id: E::Id) -> DomainResult<u64> {
        let schema = E::schema();
        let shown = id.to_string();

        let removed = self
            .session
            .delete(schema, id.into())
            .await
            .map_err(|e| e.in_operation("delete", format!("Error deleting {}", schema.entity)))?;

        tracing::debug!(table = schema.table, id = %shown, removed, "Deleted {}", schema.entity);
        Ok(removed)
    }

    /// Mark as deleted without removing the row; returns the number of marked rows
    pub async fn soft_delete_by_id(&mut self, id: E::Id) -> DomainResult<u64> {
        let schema = E::schema();
        let changes = Record::new()
            .with("is_deleted", true)
            .with("updated_at", Utc::now());

        self.session
            .update(schema, id.into(), changes)
            .await
            .map_err(|e| {
                e.in_operation("soft_delete", format!("Error deleting {}", schema.entity))
            })
    }
}
