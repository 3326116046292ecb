//! User profile entity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::audit::AuditFields;
use crate::errors::DomainResult;
use crate::repositories::schema::{Column, ColumnKind, KeyGeneration, Record, TableSchema};
use crate::repositories::Entity;

/// Status assigned when none is given
pub const DEFAULT_USER_STATUS: &str = "pending";

/// The `users_profile` table
pub static USERS_PROFILE: TableSchema = TableSchema {
    table: "users_profile",
    entity: "User",
    primary_key: "id",
    key_generation: KeyGeneration::Supplied,
    columns: &[
        Column::new("id", ColumnKind::Uuid),
        Column::new("name", ColumnKind::Text),
        Column::new("email", ColumnKind::Text),
        Column::new("domain", ColumnKind::Text),
        Column::new("username", ColumnKind::Text),
        Column::new("status", ColumnKind::Text),
        AuditFields::CREATED_AT,
        AuditFields::UPDATED_AT,
        AuditFields::CREATED_BY,
        AuditFields::UPDATED_BY,
        AuditFields::IS_DELETED,
    ],
};

/// A registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Generated by the service, never by the store
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub domain: String,
    pub username: String,
    pub status: String,
    #[serde(flatten)]
    pub audit: AuditFields,
}

impl UserProfile {
    /// Creates a new pending user with a fresh id
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        domain: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            domain: domain.into(),
            username: username.into(),
            status: DEFAULT_USER_STATUS.to_string(),
            audit: AuditFields::new(),
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }
}

impl Entity for UserProfile {
    type Id = Uuid;

    fn schema() -> &'static TableSchema {
        &USERS_PROFILE
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_record(&self) -> DomainResult<Record> {
        let mut record = Record::new()
            .with("id", self.id)
            .with("name", self.name.as_str())
            .with("email", self.email.as_str())
            .with("domain", self.domain.as_str())
            .with("username", self.username.as_str())
            .with("status", self.status.as_str());
        self.audit.write_to(&mut record);
        Ok(record)
    }

    fn from_record(mut record: Record) -> DomainResult<Self> {
        Ok(Self {
            id: record.take("id")?,
            name: record.take("name")?,
            email: record.take("email")?,
            domain: record.take("domain")?,
            username: record.take("username")?,
            status: record.take("status")?,
            audit: AuditFields::read_from(&mut record)?,
        })
    }
}
