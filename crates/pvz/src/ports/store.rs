//! Store Port
//!
//! Hands out connection handles. A handle implements every repository port, so
//! all reads and writes of one unit of work go through the same connection.

use async_trait::async_trait;

use crate::domain::errors::DomainError;
use crate::ports::repositories::{
    AuditLogRepository, ProductRepository, PvzRepository, ReceptionRepository, UserRepository,
};

/// Every repository port on one handle
pub trait Repositories:
    PvzRepository + ReceptionRepository + ProductRepository + UserRepository + AuditLogRepository
{
}

impl<T> Repositories for T where
    T: PvzRepository + ReceptionRepository + ProductRepository + UserRepository + AuditLogRepository
{
}

/// Finishing a transaction
///
/// Dropping a transactional handle without calling either method rolls it back.
#[async_trait]
pub trait UnitOfWork: Send + Sized {
    async fn commit(self) -> Result<(), DomainError>;

    async fn rollback(self) -> Result<(), DomainError>;
}

/// Source of connection handles
#[async_trait]
pub trait Store: Send + Sync + 'static {
    type Conn: Repositories + UnitOfWork + Send + 'static;

    /// A handle outside any transaction; each statement commits on its own
    async fn connect(&self) -> Result<Self::Conn, DomainError>;

    /// A handle inside a fresh transaction
    async fn begin(&self) -> Result<Self::Conn, DomainError>;
}
