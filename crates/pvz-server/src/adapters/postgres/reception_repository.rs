//! PostgreSQL implementation of ReceptionRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use pvz::{DomainError, Reception, ReceptionRepository};

use super::{
    db_error, parse_column, violated_constraint, PgConn, RECEPTIONS_ONE_OPEN_PER_PVZ,
    RECEPTIONS_PVZ_ID_FKEY,
};

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct ReceptionRow {
    id: Uuid,
    date_time: DateTime<Utc>,
    pvz_id: Uuid,
    status: String,
}

impl TryFrom<ReceptionRow> for Reception {
    type Error = DomainError;

    fn try_from(row: ReceptionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            date_time: row.date_time,
            pvz_id: row.pvz_id,
            status: parse_column("receptions.status", &row.status)?,
        })
    }
}

fn into_reception(row: Option<ReceptionRow>) -> Result<Option<Reception>, DomainError> {
    row.map(Reception::try_from).transpose()
}

#[async_trait]
impl ReceptionRepository for PgConn {
    async fn find_reception(&mut self, id: Uuid) -> Result<Option<Reception>, DomainError> {
        let row = sqlx::query_as::<_, ReceptionRow>(
            "SELECT id, date_time, pvz_id, status FROM receptions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.conn())
        .await
        .map_err(db_error)?;

        into_reception(row)
    }

    async fn lock_reception(&mut self, id: Uuid) -> Result<Option<Reception>, DomainError> {
        let row = sqlx::query_as::<_, ReceptionRow>(
            "SELECT id, date_time, pvz_id, status FROM receptions WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(self.conn())
        .await
        .map_err(db_error)?;

        into_reception(row)
    }

    async fn find_open_reception(
        &mut self,
        pvz_id: Uuid,
    ) -> Result<Option<Reception>, DomainError> {
        let row = sqlx::query_as::<_, ReceptionRow>(
            r#"
            SELECT id, date_time, pvz_id, status
            FROM receptions
            WHERE pvz_id = $1 AND status = 'in_progress'
            FOR UPDATE
            "#,
        )
        .bind(pvz_id)
        .fetch_optional(self.conn())
        .await
        .map_err(db_error)?;

        into_reception(row)
    }

    async fn find_latest_reception(
        &mut self,
        pvz_id: Uuid,
    ) -> Result<Option<Reception>, DomainError> {
        let row = sqlx::query_as::<_, ReceptionRow>(
            r#"
            SELECT id, date_time, pvz_id, status
            FROM receptions
            WHERE pvz_id = $1
            ORDER BY date_time DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(pvz_id)
        .fetch_optional(self.conn())
        .await
        .map_err(db_error)?;

        into_reception(row)
    }

    async fn list_receptions(
        &mut self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Reception>, DomainError> {
        let rows = sqlx::query_as::<_, ReceptionRow>(
            r#"
            SELECT id, date_time, pvz_id, status
            FROM receptions
            ORDER BY date_time DESC, id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.conn())
        .await
        .map_err(db_error)?;

        rows.into_iter().map(Reception::try_from).collect()
    }

    async fn insert_reception(&mut self, reception: &Reception) -> Result<Reception, DomainError> {
        let row = sqlx::query_as::<_, ReceptionRow>(
            r#"
            INSERT INTO receptions (id, date_time, pvz_id, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, date_time, pvz_id, status
            "#,
        )
        .bind(reception.id)
        .bind(reception.date_time)
        .bind(reception.pvz_id)
        .bind(reception.status.as_str())
        .fetch_one(self.conn())
        .await
        .map_err(|e| match violated_constraint(&e) {
            Some(RECEPTIONS_ONE_OPEN_PER_PVZ) => DomainError::AlreadyOpen {
                pvz_id: reception.pvz_id,
            },
            // PVZ deleted after the caller looked it up
            Some(RECEPTIONS_PVZ_ID_FKEY) => DomainError::not_found("Pvz", reception.pvz_id),
            _ => db_error(e),
        })?;

        row.try_into()
    }

    async fn close_reception(&mut self, id: Uuid) -> Result<Option<Reception>, DomainError> {
        let row = sqlx::query_as::<_, ReceptionRow>(
            r#"
            UPDATE receptions
            SET status = 'closed'
            WHERE id = $1 AND status = 'in_progress'
            RETURNING id, date_time, pvz_id, status
            "#,
        )
        .bind(id)
        .fetch_optional(self.conn())
        .await
        .map_err(db_error)?;

        into_reception(row)
    }
}
