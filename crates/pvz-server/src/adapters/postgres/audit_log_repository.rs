//! PostgreSQL implementation of AuditLogRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use pvz::{AuditLogEntry, AuditLogRepository, DomainError};

use super::{db_error, parse_column, PgConn};

#[derive(sqlx::FromRow)]
struct AuditRow {
    id: Uuid,
    operation: String,
    pvz_id: Uuid,
    user_id: Uuid,
    created_at: DateTime<Utc>,
}

impl TryFrom<AuditRow> for AuditLogEntry {
    type Error = DomainError;

    fn try_from(row: AuditRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            operation: parse_column("audit_log.operation", &row.operation)?,
            pvz_id: row.pvz_id,
            user_id: row.user_id,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl AuditLogRepository for PgConn {
    async fn append_audit_entry(
        &mut self,
        entry: &AuditLogEntry,
    ) -> Result<AuditLogEntry, DomainError> {
        let row = sqlx::query_as::<_, AuditRow>(
            r#"
            INSERT INTO audit_log (id, operation, pvz_id, user_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, operation, pvz_id, user_id, created_at
            "#,
        )
        .bind(entry.id)
        .bind(entry.operation.as_str())
        .bind(entry.pvz_id)
        .bind(entry.user_id)
        .bind(entry.created_at)
        .fetch_one(self.conn())
        .await
        .map_err(db_error)?;

        row.try_into()
    }

    async fn find_audit_entries(
        &mut self,
        pvz_id: Uuid,
    ) -> Result<Vec<AuditLogEntry>, DomainError> {
        let rows = sqlx::query_as::<_, AuditRow>(
            r#"
            SELECT id, operation, pvz_id, user_id, created_at
            FROM audit_log
            WHERE pvz_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(pvz_id)
        .fetch_all(self.conn())
        .await
        .map_err(db_error)?;

        rows.into_iter().map(AuditLogEntry::try_from).collect()
    }
}
