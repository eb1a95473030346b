//! PostgreSQL Store and Repository Implementations
//!
//! `PgConn` is either a plain pooled connection or an open transaction; every
//! repository port is implemented once on it, so a unit of work runs all of
//! its statements on the same transaction.

mod audit_log_repository;
mod product_repository;
mod pvz_repository;
mod reception_repository;
mod user_repository;

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};

use pvz::{DomainError, Store, UnitOfWork};

pub(crate) const PVZ_CITY_KEY: &str = "pvz_city_key";
pub(crate) const USERS_EMAIL_KEY: &str = "users_email_key";
pub(crate) const RECEPTIONS_ONE_OPEN_PER_PVZ: &str = "receptions_one_open_per_pvz";
pub(crate) const RECEPTIONS_PVZ_ID_FKEY: &str = "receptions_pvz_id_fkey";

/// Name of the constraint a database error violated, if any
pub(crate) fn violated_constraint(err: &sqlx::Error) -> Option<&str> {
    err.as_database_error().and_then(|db| db.constraint())
}

/// Map a driver error that no caller translated into a domain kind
pub(crate) fn db_error(err: sqlx::Error) -> DomainError {
    DomainError::internal(err)
}

/// Parse a text column into a domain value
pub(crate) fn parse_column<T>(column: &'static str, raw: &str) -> Result<T, DomainError>
where
    T: std::str::FromStr<Err = String>,
{
    raw.parse()
        .map_err(|e| DomainError::internal(format!("corrupt {} column: {}", column, e)))
}

/// PostgreSQL implementation of the Store port
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// A pooled connection, optionally inside a transaction
pub enum PgConn {
    Pooled(PoolConnection<Postgres>),
    Tx(Transaction<'static, Postgres>),
}

impl PgConn {
    fn conn(&mut self) -> &mut PgConnection {
        match self {
            PgConn::Pooled(c) => &mut **c,
            PgConn::Tx(tx) => &mut **tx,
        }
    }
}

#[async_trait]
impl Store for PgStore {
    type Conn = PgConn;

    async fn connect(&self) -> Result<PgConn, DomainError> {
        self.pool.acquire().await.map(PgConn::Pooled).map_err(db_error)
    }

    async fn begin(&self) -> Result<PgConn, DomainError> {
        self.pool.begin().await.map(PgConn::Tx).map_err(db_error)
    }
}

#[async_trait]
impl UnitOfWork for PgConn {
    async fn commit(self) -> Result<(), DomainError> {
        match self {
            PgConn::Tx(tx) => tx.commit().await.map_err(db_error),
            PgConn::Pooled(_) => Ok(()),
        }
    }

    async fn rollback(self) -> Result<(), DomainError> {
        match self {
            PgConn::Tx(tx) => tx.rollback().await.map_err(db_error),
            PgConn::Pooled(_) => Ok(()),
        }
    }
}
