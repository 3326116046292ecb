//! Unit tests for audit fields

use uuid::Uuid;

use crate::domain::entities::audit::AuditFields;
use crate::repositories::Record;

#[test]
fn test_new_audit_fields() {
    let audit = AuditFields::new();
    assert_eq!(audit.created_at, audit.updated_at);
    assert!(audit.created_by.is_none());
    assert!(!audit.is_deleted);
}

#[test]
fn test_write_and_read_record() {
    let mut audit = AuditFields::new();
    audit.created_by = Some(Uuid::new_v4());
    let mut record = Record::new();
    audit.write_to(&mut record);
    assert_eq!(record.len(), 5);

    let restored = AuditFields::read_from(&mut record).unwrap();
    assert_eq!(restored, audit);
    assert!(record.is_empty());
}
