//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! repositories, the transaction coordinator and the entity caches.

mod audit_log;
mod product_service;
mod pvz_service;
mod reception_service;
mod transaction;
mod user_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use audit_log::AuditLog;
pub use product_service::ProductService;
pub use pvz_service::PvzService;
pub use reception_service::ReceptionService;
pub use transaction::TransactionCoordinator;
pub use user_service::UserService;

use pvz::DomainError;

/// Validate an offset/limit window
pub(crate) fn check_window(offset: i64, limit: i64) -> Result<(), DomainError> {
    if offset < 0 {
        return Err(DomainError::invalid("offset", "must not be negative"));
    }
    if limit < 1 {
        return Err(DomainError::invalid("limit", "must be at least 1"));
    }
    Ok(())
}

/// Offset of a 1-based page
pub(crate) fn page_offset(page: i64, limit: i64) -> Result<i64, DomainError> {
    if page < 1 {
        return Err(DomainError::invalid("page", "must be at least 1"));
    }
    if limit < 1 {
        return Err(DomainError::invalid("limit", "must be at least 1"));
    }
    (page - 1)
        .checked_mul(limit)
        .ok_or_else(|| DomainError::invalid("page", "out of range"))
}
