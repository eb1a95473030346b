//! PostgreSQL implementation of ProductRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use pvz::{DomainError, Product, ProductRepository};

use super::{db_error, parse_column, PgConn};

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    date_time: DateTime<Utc>,
    product_type: String,
    reception_id: Uuid,
}

impl TryFrom<ProductRow> for Product {
    type Error = DomainError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            date_time: row.date_time,
            product_type: parse_column("products.product_type", &row.product_type)?,
            reception_id: row.reception_id,
        })
    }
}

#[async_trait]
impl ProductRepository for PgConn {
    async fn find_product(&mut self, id: Uuid) -> Result<Option<Product>, DomainError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, date_time, product_type, reception_id FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.conn())
        .await
        .map_err(db_error)?;

        row.map(Product::try_from).transpose()
    }

    async fn find_products_by_reception(
        &mut self,
        reception_id: Uuid,
    ) -> Result<Vec<Product>, DomainError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, date_time, product_type, reception_id
            FROM products
            WHERE reception_id = $1
            ORDER BY date_time, seq
            "#,
        )
        .bind(reception_id)
        .fetch_all(self.conn())
        .await
        .map_err(db_error)?;

        rows.into_iter().map(Product::try_from).collect()
    }

    async fn list_products(
        &mut self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Product>, DomainError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, date_time, product_type, reception_id
            FROM products
            ORDER BY date_time DESC, seq DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.conn())
        .await
        .map_err(db_error)?;

        rows.into_iter().map(Product::try_from).collect()
    }

    async fn insert_product(&mut self, product: &Product) -> Result<Product, DomainError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (id, date_time, product_type, reception_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, date_time, product_type, reception_id
            "#,
        )
        .bind(product.id)
        .bind(product.date_time)
        .bind(product.product_type.as_str())
        .bind(product.reception_id)
        .fetch_one(self.conn())
        .await
        .map_err(db_error)?;

        row.try_into()
    }

    async fn delete_last_product(
        &mut self,
        reception_id: Uuid,
    ) -> Result<Option<Product>, DomainError> {
        // Select and delete in one statement; seq breaks date_time ties
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            DELETE FROM products
            WHERE id = (
                SELECT id FROM products
                WHERE reception_id = $1
                ORDER BY date_time DESC, seq DESC
                LIMIT 1
                FOR UPDATE
            )
            RETURNING id, date_time, product_type, reception_id
            "#,
        )
        .bind(reception_id)
        .fetch_optional(self.conn())
        .await
        .map_err(db_error)?;

        row.map(Product::try_from).transpose()
    }
}
