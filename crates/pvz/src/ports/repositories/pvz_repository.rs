//! PVZ Repository Port
//!
//! Abstract interface for PVZ persistence operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{errors::DomainError, Pvz, PvzWithReceptions};

/// Filter and window for the PVZ -> Reception -> Product join
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PvzReceptionFilter {
    /// Inclusive lower bound on reception date_time
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound on reception date_time
    pub end: Option<DateTime<Utc>>,
    pub offset: i64,
    pub limit: i64,
}

impl PvzReceptionFilter {
    /// Whether the filter restricts receptions by date at all
    pub fn is_bounded(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Whether a reception timestamp falls inside the window
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.map_or(true, |s| at >= s) && self.end.map_or(true, |e| at <= e)
    }
}

/// Repository interface for PVZ entities
#[async_trait]
pub trait PvzRepository: Send {
    /// Find a PVZ by ID
    async fn find_pvz(&mut self, id: Uuid) -> Result<Option<Pvz>, DomainError>;

    /// Find the PVZ registered for a city
    async fn find_pvz_by_city(&mut self, city: &str) -> Result<Option<Pvz>, DomainError>;

    /// Find all PVZs, newest first
    async fn find_all_pvz(&mut self) -> Result<Vec<Pvz>, DomainError>;

    /// List a window of PVZs, newest first
    async fn list_pvz(&mut self, offset: i64, limit: i64) -> Result<Vec<Pvz>, DomainError>;

    /// Insert a new PVZ
    async fn insert_pvz(&mut self, pvz: &Pvz) -> Result<Pvz, DomainError>;

    /// Update the mutable fields of a PVZ
    async fn update_pvz(&mut self, pvz: &Pvz) -> Result<Option<Pvz>, DomainError>;

    /// Delete a PVZ (and, through ownership, its receptions and products)
    async fn delete_pvz(&mut self, id: Uuid) -> Result<bool, DomainError>;

    /// One page of PVZs with their receptions and products
    async fn list_pvz_with_receptions(
        &mut self,
        filter: &PvzReceptionFilter,
    ) -> Result<Vec<PvzWithReceptions>, DomainError>;
}
