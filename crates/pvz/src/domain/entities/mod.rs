//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - Pvz: Pickup point
//! - Reception: Goods-receiving session at a PVZ
//! - Product: Item scanned into a reception
//! - User: Employee or administrator
//! - AuditLogEntry: Attribution of PVZ changes

mod audit;
mod product;
mod pvz;
mod reception;
mod user;

pub use audit::*;
pub use product::*;
pub use pvz::*;
pub use reception::*;
pub use user::*;
