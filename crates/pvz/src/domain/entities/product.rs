//! Product - An item scanned into a reception
//!
//! Pure domain entity without infrastructure dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::ProductType;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub id: Uuid,
    pub date_time: DateTime<Utc>,
    pub product_type: ProductType,
    pub reception_id: Uuid,
}

impl Product {
    /// Create a new product stamped with the current time
    pub fn new(reception_id: Uuid, product_type: ProductType) -> Self {
        Self {
            id: Uuid::new_v4(),
            date_time: Utc::now(),
            product_type,
            reception_id,
        }
    }
}
