//! PVZ API Routes
//!
//! - /dummyLogin, /register, /login - Token issuance (public)
//! - /pvz - Pickup point management and the paginated listing
//! - /reception - Opening and closing receptions
//! - /product - Scanning and undoing products

pub mod auth;
pub mod error;
pub mod product;
pub mod pvz;
pub mod reception;
pub mod swagger;
