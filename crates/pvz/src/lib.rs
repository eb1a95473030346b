//! PVZ Domain Library
//!
//! Core domain types and interfaces for tracking pickup points (PVZ), the
//! receptions opened at them and the products scanned into a reception.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (Pvz, Reception, Product, User, AuditLogEntry)
//!   - `value_objects/`: Immutable value types (Role, ReceptionStatus, ProductType, CityPolicy)
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Data access interfaces
//!   - `store/`: Connection and transaction handles
//!
//! # Usage
//!
//! ```rust,ignore
//! use pvz::domain::{Pvz, Reception, Product};
//! use pvz::ports::{Store, ReceptionRepository};
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    AuditLogEntry, AuditOperation, CityPolicy, DomainError, Product, ProductType, Pvz, PvzJoinRow,
    PvzWithReceptions, Reception, ReceptionStatus, ReceptionWithProducts, Role, User,
    CITY_MAX_LEN, CITY_MIN_LEN,
};
pub use ports::{
    AuditLogRepository, ProductRepository, PvzReceptionFilter, PvzRepository, ReceptionRepository,
    Repositories, Store, UnitOfWork, UserRepository,
};
