//! Reception Repository Port
//!
//! Abstract interface for Reception persistence operations.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, Reception};

/// Repository interface for Reception entities
#[async_trait]
pub trait ReceptionRepository: Send {
    /// Find a Reception by ID
    async fn find_reception(&mut self, id: Uuid) -> Result<Option<Reception>, DomainError>;

    /// Find a Reception by ID and lock it until the surrounding transaction ends
    async fn lock_reception(&mut self, id: Uuid) -> Result<Option<Reception>, DomainError>;

    /// Find the in-progress Reception of a PVZ, locking it
    async fn find_open_reception(&mut self, pvz_id: Uuid)
        -> Result<Option<Reception>, DomainError>;

    /// Find the most recently opened Reception of a PVZ, whatever its status
    async fn find_latest_reception(
        &mut self,
        pvz_id: Uuid,
    ) -> Result<Option<Reception>, DomainError>;

    /// List a window of Receptions, newest first
    async fn list_receptions(
        &mut self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Reception>, DomainError>;

    /// Insert a new Reception.
    ///
    /// Fails with `AlreadyOpen` if the PVZ already has one in progress.
    async fn insert_reception(&mut self, reception: &Reception) -> Result<Reception, DomainError>;

    /// Move an in-progress Reception to closed.
    ///
    /// Returns `None` when the Reception is missing or was not in progress.
    async fn close_reception(&mut self, id: Uuid) -> Result<Option<Reception>, DomainError>;
}
