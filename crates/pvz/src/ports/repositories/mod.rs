//! Repository Ports
//!
//! Abstract interfaces for data persistence operations.
//!
//! Methods take `&mut self`: an implementor is a single connection or
//! transaction handle, never a shared pool.

mod audit_log_repository;
mod product_repository;
mod pvz_repository;
mod reception_repository;
mod user_repository;

pub use audit_log_repository::*;
pub use product_repository::*;
pub use pvz_repository::*;
pub use reception_repository::*;
pub use user_repository::*;
