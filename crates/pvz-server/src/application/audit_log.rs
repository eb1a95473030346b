//! Audit Log
//!
//! Appends attribution entries through the caller's transaction handle, so an
//! audit write commits or rolls back together with the PVZ change it records.

use uuid::Uuid;

use pvz::{AuditLogEntry, AuditLogRepository, AuditOperation, DomainError};

pub struct AuditLog;

impl AuditLog {
    pub async fn log_pvz_creation<C>(
        conn: &mut C,
        pvz_id: Uuid,
        user_id: Uuid,
    ) -> Result<AuditLogEntry, DomainError>
    where
        C: AuditLogRepository + ?Sized,
    {
        Self::record(conn, AuditOperation::PvzCreate, pvz_id, user_id).await
    }

    pub async fn log_pvz_update<C>(
        conn: &mut C,
        pvz_id: Uuid,
        user_id: Uuid,
    ) -> Result<AuditLogEntry, DomainError>
    where
        C: AuditLogRepository + ?Sized,
    {
        Self::record(conn, AuditOperation::PvzUpdate, pvz_id, user_id).await
    }

    pub async fn log_pvz_deletion<C>(
        conn: &mut C,
        pvz_id: Uuid,
        user_id: Uuid,
    ) -> Result<AuditLogEntry, DomainError>
    where
        C: AuditLogRepository + ?Sized,
    {
        Self::record(conn, AuditOperation::PvzDelete, pvz_id, user_id).await
    }

    async fn record<C>(
        conn: &mut C,
        operation: AuditOperation,
        pvz_id: Uuid,
        user_id: Uuid,
    ) -> Result<AuditLogEntry, DomainError>
    where
        C: AuditLogRepository + ?Sized,
    {
        let entry = AuditLogEntry::new(operation, pvz_id, user_id);
        let saved = conn.append_audit_entry(&entry).await?;
        tracing::debug!("Audit: {} pvz={} user={}", operation, pvz_id, user_id);
        Ok(saved)
    }
}
