//! Audit columns carried by every persisted entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DomainResult;
use crate::repositories::schema::{Column, ColumnKind, Record};

/// Creation/modification bookkeeping and the soft-delete flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditFields {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub is_deleted: bool,
}

impl AuditFields {
    pub const CREATED_AT: Column = Column::new("created_at", ColumnKind::Timestamp);
    pub const UPDATED_AT: Column = Column::new("updated_at", ColumnKind::Timestamp);
    pub const CREATED_BY: Column = Column::new("created_by", ColumnKind::Uuid).nullable();
    pub const UPDATED_BY: Column = Column::new("updated_by", ColumnKind::Uuid).nullable();
    pub const IS_DELETED: Column = Column::new("is_deleted", ColumnKind::Bool);

    /// Fresh audit fields stamped with the current time
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            created_by: None,
            updated_by: None,
            is_deleted: false,
        }
    }

    pub fn write_to(&self, record: &mut Record) {
        record
            .set(Self::CREATED_AT.name, self.created_at)
            .set(Self::UPDATED_AT.name, self.updated_at)
            .set(Self::CREATED_BY.name, self.created_by)
            .set(Self::UPDATED_BY.name, self.updated_by)
            .set(Self::IS_DELETED.name, self.is_deleted);
    }

    pub fn read_from(record: &mut Record) -> DomainResult<Self> {
        Ok(Self {
            created_at: record.take(Self::CREATED_AT.name)?,
            updated_at: record.take(Self::UPDATED_AT.name)?,
            created_by: record.take_opt(Self::CREATED_BY.name)?,
            updated_by: record.take_opt(Self::UPDATED_BY.name)?,
            is_deleted: record.take(Self::IS_DELETED.name)?,
        })
    }
}

impl Default for AuditFields {
    fn default() -> Self {
        Self::new()
    }
}
