//! Generic persistence layer.
//!
//! - `schema` - table descriptions and dynamically-typed rows
//! - `entity` - the trait every persisted domain type implements
//! - `query` - filters, operators and sorting
//! - `session` - the store and unit-of-work traits
//! - `repository` - typed CRUD over any entity
//! - `memory` - in-memory store

pub mod entity;
pub mod memory;
pub mod query;
pub mod repository;
pub mod schema;
pub mod session;

pub use entity::Entity;
pub use memory::{MemorySession, MemoryStore};
pub use query::{parse_sort_order, Condition, Filter, Filters, ListQuery, Operator, Selection};
pub use repository::Repository;
pub use schema::{Column, ColumnKind, FieldValue, FromField, KeyGeneration, Record, TableSchema};
pub use session::{finish, Session, Store};

#[cfg(test)]
mod tests;
