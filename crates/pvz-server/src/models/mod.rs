//! PVZ API Data Models
//!
//! Request/response DTOs. Field names are camelCase on the wire.

mod auth;
mod error;
mod product;
mod pvz;
mod reception;
mod window;

pub use auth::*;
pub use error::*;
pub use product::*;
pub use pvz::*;
pub use reception::*;
pub use window::*;
