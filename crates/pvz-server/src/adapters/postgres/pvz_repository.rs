//! PostgreSQL implementation of PvzRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use pvz::{
    DomainError, Product, Pvz, PvzJoinRow, PvzReceptionFilter, PvzRepository, PvzWithReceptions,
    Reception,
};

use super::{db_error, parse_column, violated_constraint, PgConn, PVZ_CITY_KEY};

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct PvzRow {
    id: Uuid,
    created_at: DateTime<Utc>,
    city: String,
}

impl From<PvzRow> for Pvz {
    fn from(row: PvzRow) -> Self {
        Self {
            id: row.id,
            created_at: row.created_at,
            city: row.city,
        }
    }
}

/// One flat row of the PVZ -> Reception -> Product left join
#[derive(sqlx::FromRow)]
struct PvzJoinRecord {
    pvz_id: Uuid,
    pvz_created_at: DateTime<Utc>,
    city: String,
    reception_id: Option<Uuid>,
    reception_date_time: Option<DateTime<Utc>>,
    reception_status: Option<String>,
    product_id: Option<Uuid>,
    product_date_time: Option<DateTime<Utc>>,
    product_type: Option<String>,
}

impl TryFrom<PvzJoinRecord> for PvzJoinRow {
    type Error = DomainError;

    fn try_from(row: PvzJoinRecord) -> Result<Self, Self::Error> {
        let reception = match (row.reception_id, row.reception_date_time, row.reception_status) {
            (Some(id), Some(date_time), Some(status)) => Some(Reception {
                id,
                date_time,
                pvz_id: row.pvz_id,
                status: parse_column("receptions.status", &status)?,
            }),
            _ => None,
        };

        let product = match (&reception, row.product_id, row.product_date_time, row.product_type) {
            (Some(r), Some(id), Some(date_time), Some(product_type)) => Some(Product {
                id,
                date_time,
                product_type: parse_column("products.product_type", &product_type)?,
                reception_id: r.id,
            }),
            _ => None,
        };

        Ok(PvzJoinRow {
            pvz: Pvz {
                id: row.pvz_id,
                created_at: row.pvz_created_at,
                city: row.city,
            },
            reception,
            product,
        })
    }
}

const PVZ_COLUMNS: &str = "id, created_at, city";

fn city_taken(err: sqlx::Error, city: &str) -> DomainError {
    match violated_constraint(&err) {
        Some(PVZ_CITY_KEY) => DomainError::already_exists("Pvz", city),
        _ => db_error(err),
    }
}

#[async_trait]
impl PvzRepository for PgConn {
    async fn find_pvz(&mut self, id: Uuid) -> Result<Option<Pvz>, DomainError> {
        let row = sqlx::query_as::<_, PvzRow>(&format!(
            "SELECT {PVZ_COLUMNS} FROM pvz WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.conn())
        .await
        .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn find_pvz_by_city(&mut self, city: &str) -> Result<Option<Pvz>, DomainError> {
        let row = sqlx::query_as::<_, PvzRow>(&format!(
            "SELECT {PVZ_COLUMNS} FROM pvz WHERE city = $1"
        ))
        .bind(city)
        .fetch_optional(self.conn())
        .await
        .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn find_all_pvz(&mut self) -> Result<Vec<Pvz>, DomainError> {
        let rows = sqlx::query_as::<_, PvzRow>(&format!(
            "SELECT {PVZ_COLUMNS} FROM pvz ORDER BY created_at DESC, id"
        ))
        .fetch_all(self.conn())
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_pvz(&mut self, offset: i64, limit: i64) -> Result<Vec<Pvz>, DomainError> {
        let rows = sqlx::query_as::<_, PvzRow>(&format!(
            "SELECT {PVZ_COLUMNS} FROM pvz ORDER BY created_at DESC, id LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.conn())
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert_pvz(&mut self, pvz: &Pvz) -> Result<Pvz, DomainError> {
        let row = sqlx::query_as::<_, PvzRow>(&format!(
            "INSERT INTO pvz (id, created_at, city) VALUES ($1, $2, $3) RETURNING {PVZ_COLUMNS}"
        ))
        .bind(pvz.id)
        .bind(pvz.created_at)
        .bind(&pvz.city)
        .fetch_one(self.conn())
        .await
        .map_err(|e| city_taken(e, &pvz.city))?;

        Ok(row.into())
    }

    async fn update_pvz(&mut self, pvz: &Pvz) -> Result<Option<Pvz>, DomainError> {
        let row = sqlx::query_as::<_, PvzRow>(&format!(
            "UPDATE pvz SET city = $2 WHERE id = $1 RETURNING {PVZ_COLUMNS}"
        ))
        .bind(pvz.id)
        .bind(&pvz.city)
        .fetch_optional(self.conn())
        .await
        .map_err(|e| city_taken(e, &pvz.city))?;

        Ok(row.map(Into::into))
    }

    async fn delete_pvz(&mut self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM pvz WHERE id = $1")
            .bind(id)
            .execute(self.conn())
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_pvz_with_receptions(
        &mut self,
        filter: &PvzReceptionFilter,
    ) -> Result<Vec<PvzWithReceptions>, DomainError> {
        // Pages count PVZs, not joined rows
        let records = sqlx::query_as::<_, PvzJoinRecord>(
            r#"
            WITH page AS (
                SELECT p.id, p.created_at, p.city
                FROM pvz p
                WHERE NOT $3 OR EXISTS (
                    SELECT 1 FROM receptions r
                    WHERE r.pvz_id = p.id
                      AND ($1::timestamptz IS NULL OR r.date_time >= $1)
                      AND ($2::timestamptz IS NULL OR r.date_time <= $2)
                )
                ORDER BY p.created_at DESC, p.id
                LIMIT $4 OFFSET $5
            )
            SELECT page.id AS pvz_id,
                   page.created_at AS pvz_created_at,
                   page.city,
                   r.id AS reception_id,
                   r.date_time AS reception_date_time,
                   r.status AS reception_status,
                   pr.id AS product_id,
                   pr.date_time AS product_date_time,
                   pr.product_type
            FROM page
            LEFT JOIN receptions r
                   ON r.pvz_id = page.id
                  AND ($1::timestamptz IS NULL OR r.date_time >= $1)
                  AND ($2::timestamptz IS NULL OR r.date_time <= $2)
            LEFT JOIN products pr ON pr.reception_id = r.id
            ORDER BY page.created_at DESC, page.id, r.date_time, r.id, pr.date_time, pr.seq
            "#,
        )
        .bind(filter.start)
        .bind(filter.end)
        .bind(filter.is_bounded())
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(self.conn())
        .await
        .map_err(db_error)?;

        let rows = records
            .into_iter()
            .map(PvzJoinRow::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PvzWithReceptions::group(rows))
    }
}
