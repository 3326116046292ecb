//! In-memory store used by the test suites.
//!
//! Each session reads from a snapshot of the tables taken at `begin` and
//! keeps a log of its writes. `commit` replays that log onto the current
//! tables, so concurrent sessions only meet on the rows they both touch.
//! Sequences are shared and never roll back, like database sequences.

use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use sv_shared::SortOrder;

use crate::errors::{DomainError, DomainResult};

use super::query::{Condition, Operator, Selection};
use super::schema::{Column, FieldValue, KeyGeneration, Record, TableSchema};
use super::session::{Session, Store};

#[derive(Debug, Clone, Default)]
struct Tables {
    rows: HashMap<&'static str, Vec<Record>>,
    schemas: HashMap<&'static str, &'static TableSchema>,
}

impl Tables {
    fn has_row(&self, table: &str, key: &FieldValue) -> bool {
        let Some(schema) = self.schemas.get(table) else {
            return false;
        };
        self.rows.get(table).map_or(false, |rows| {
            rows.iter().any(|row| row.get(schema.primary_key) == Some(key))
        })
    }

    /// Insert after the key, NOT NULL and foreign key checks
    fn insert(&mut self, schema: &'static TableSchema, record: Record) -> DomainResult<()> {
        let key = record
            .get(schema.primary_key)
            .cloned()
            .unwrap_or(FieldValue::Null);
        if key.is_null() {
            return Err(not_null_violation(schema, schema.primary_key));
        }

        for column in schema.columns {
            let value = record.get(column.name).unwrap_or(&FieldValue::Null);
            if value.is_null() && !column.nullable {
                return Err(not_null_violation(schema, column.name));
            }
            if let (Some(parent), false) = (column.references, value.is_null()) {
                if !self.has_row(parent, value) {
                    return Err(DomainError::database(
                        format!(
                            "insert on \"{}\" violates foreign key on column \"{}\"",
                            schema.table, column.name
                        ),
                        Some("insert"),
                    ));
                }
            }
        }

        self.schemas.insert(schema.table, schema);
        if self.has_row(schema.table, &key) {
            return Err(DomainError::duplicate(schema.entity, key.to_string()));
        }
        self.rows.entry(schema.table).or_default().push(record);
        Ok(())
    }

    fn update(&mut self, schema: &'static TableSchema, key: &FieldValue, changes: &Record) -> u64 {
        let Some(rows) = self.rows.get_mut(schema.table) else {
            return 0;
        };

        let mut affected = 0;
        for row in rows
            .iter_mut()
            .filter(|row| row.get(schema.primary_key) == Some(key))
        {
            for (column, value) in changes.iter() {
                row.set(column, value.clone());
            }
            affected += 1;
        }
        affected
    }

    /// Delete matching rows and cascade to their children
    fn delete_where(&mut self, table: &'static str, column: &str, value: &FieldValue) -> usize {
        let Some(schema) = self.schemas.get(table).copied() else {
            return 0;
        };
        let Some(rows) = self.rows.get_mut(table) else {
            return 0;
        };

        let mut removed_keys = Vec::new();
        rows.retain(|row| {
            let matched = row.get(column) == Some(value);
            if matched {
                removed_keys.push(row.get(schema.primary_key).cloned().unwrap_or(FieldValue::Null));
            }
            !matched
        });

        for key in &removed_keys {
            self.cascade(table, key);
        }
        removed_keys.len()
    }

    fn cascade(&mut self, parent: &'static str, key: &FieldValue) {
        let children: Vec<(&'static str, &'static str)> = self
            .schemas
            .values()
            .flat_map(|schema| {
                schema
                    .references_to(parent)
                    .map(move |column| (schema.table, column.name))
            })
            .collect();

        for (table, column) in children {
            self.delete_where(table, column, key);
        }
    }

    fn apply(&mut self, change: &Change) -> DomainResult<()> {
        match change {
            Change::Insert { schema, record } => self.insert(*schema, record.clone()),
            Change::Update { schema, key, changes } => {
                self.update(*schema, key, changes);
                Ok(())
            }
            Change::Delete { schema, key } => {
                self.delete_where(schema.table, schema.primary_key, key);
                Ok(())
            }
        }
    }
}

fn not_null_violation(schema: &TableSchema, column: &str) -> DomainError {
    DomainError::database(
        format!("null value in column \"{}\" of relation \"{}\"", column, schema.table),
        Some("insert"),
    )
}

/// One write recorded by a session
#[derive(Debug, Clone)]
enum Change {
    Insert {
        schema: &'static TableSchema,
        record: Record,
    },
    Update {
        schema: &'static TableSchema,
        key: FieldValue,
        changes: Record,
    },
    Delete {
        schema: &'static TableSchema,
        key: FieldValue,
    },
}

/// Shared in-memory tables
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    sequences: Arc<Mutex<HashMap<&'static str, i64>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) async fn count(&self, table: &str) -> usize {
        let tables = self.tables.read().await;
        tables.rows.get(table).map_or(0, Vec::len)
    }
}

#[async_trait]
impl Store for MemoryStore {
    type Session = MemorySession;

    async fn begin(&self) -> DomainResult<MemorySession> {
        let snapshot = self.tables.read().await.clone();
        Ok(MemorySession {
            store: self.clone(),
            working: snapshot,
            changes: Vec::new(),
        })
    }
}

/// Snapshot-isolated unit of work over a [`MemoryStore`]
pub struct MemorySession {
    store: MemoryStore,
    working: Tables,
    changes: Vec<Change>,
}

impl MemorySession {
    async fn next_key(&self, table: &'static str) -> i64 {
        let mut sequences = self.store.sequences.lock().await;
        let next = sequences.entry(table).or_insert(0);
        *next += 1;
        *next
    }
}

fn row_matches(row: &Record, condition: &Condition) -> bool {
    let actual = row.get(condition.column.name).unwrap_or(&FieldValue::Null);
    let expected = &condition.value;

    if expected.is_null() {
        return match condition.operator {
            Operator::Eq => actual.is_null(),
            Operator::Ne => !actual.is_null(),
            _ => false,
        };
    }
    if actual.is_null() {
        // SQL comparisons against NULL are never true
        return false;
    }

    match condition.operator {
        Operator::Eq => actual == expected,
        Operator::Ne => actual != expected,
        Operator::Gt => actual.compare(expected) == Some(Ordering::Greater),
        Operator::Gte => matches!(
            actual.compare(expected),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Operator::Lt => actual.compare(expected) == Some(Ordering::Less),
        Operator::Lte => matches!(
            actual.compare(expected),
            Some(Ordering::Less | Ordering::Equal)
        ),
        Operator::Contains => match (actual, expected) {
            (FieldValue::Text(haystack), FieldValue::Text(needle)) => haystack
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => false,
        },
    }
}

/// NULLs sort last ascending and first descending
fn compare_rows(a: &Record, b: &Record, order_by: &[(&'static Column, SortOrder)]) -> Ordering {
    for (column, order) in order_by {
        let left = a.get(column.name).unwrap_or(&FieldValue::Null);
        let right = b.get(column.name).unwrap_or(&FieldValue::Null);
        let ordering = match (left.is_null(), right.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => left.compare(right).unwrap_or(Ordering::Equal),
        };
        let ordering = match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[async_trait]
impl Session for MemorySession {
    async fn insert(&mut self, schema: &'static TableSchema, mut record: Record) -> DomainResult<Record> {
        if schema.key_generation == KeyGeneration::Serial {
            let key = self.next_key(schema.table).await;
            record.set(schema.primary_key, key);
        }

        self.working.insert(schema, record.clone())?;
        self.changes.push(Change::Insert {
            schema,
            record: record.clone(),
        });
        Ok(record)
    }

    async fn select(
        &mut self,
        schema: &'static TableSchema,
        selection: &Selection,
    ) -> DomainResult<Vec<Record>> {
        let Some(rows) = self.working.rows.get(schema.table) else {
            return Ok(Vec::new());
        };

        let mut found: Vec<Record> = rows
            .iter()
            .filter(|row| selection.conditions.iter().all(|c| row_matches(row, c)))
            .cloned()
            .collect();

        found.sort_by(|a, b| compare_rows(a, b, &selection.order_by));
        if let Some(limit) = selection.limit {
            found.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(found)
    }

    async fn update(
        &mut self,
        schema: &'static TableSchema,
        key: FieldValue,
        changes: Record,
    ) -> DomainResult<u64> {
        let affected = self.working.update(schema, &key, &changes);
        if affected > 0 {
            self.changes.push(Change::Update { schema, key, changes });
        }
        Ok(affected)
    }

    async fn delete(&mut self, schema: &'static TableSchema, key: FieldValue) -> DomainResult<u64> {
        let removed = self.working.delete_where(schema.table, schema.primary_key, &key);
        if removed > 0 {
            self.changes.push(Change::Delete { schema, key });
        }
        Ok(removed as u64)
    }

    async fn commit(self) -> DomainResult<()> {
        let mut tables = self.store.tables.write().await;
        let mut merged = tables.clone();
        for change in &self.changes {
            merged.apply(change)?;
        }
        *tables = merged;
        Ok(())
    }

    async fn rollback(self) -> DomainResult<()> {
        Ok(())
    }
}
