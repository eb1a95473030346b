//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod audit_operation;
mod city;
mod product_type;
mod reception_status;
mod role;

pub use audit_operation::*;
pub use city::*;
pub use product_type::*;
pub use reception_status::*;
pub use role::*;
