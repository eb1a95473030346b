//! Audit Log Repository Port
//!
//! Append-only: no update or delete.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, AuditLogEntry};

#[async_trait]
pub trait AuditLogRepository: Send {
    /// Append one entry
    async fn append_audit_entry(&mut self, entry: &AuditLogEntry)
        -> Result<AuditLogEntry, DomainError>;

    /// Entries for a PVZ, oldest first
    async fn find_audit_entries(&mut self, pvz_id: Uuid)
        -> Result<Vec<AuditLogEntry>, DomainError>;
}
