//! Reception - A goods-receiving session at a PVZ
//!
//! Pure domain entity without infrastructure dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::ReceptionStatus;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reception {
    pub id: Uuid,
    pub date_time: DateTime<Utc>,
    pub pvz_id: Uuid,
    pub status: ReceptionStatus,
}

impl Reception {
    /// Open a new reception for a PVZ
    pub fn new(pvz_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            date_time: Utc::now(),
            pvz_id,
            status: ReceptionStatus::InProgress,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }
}
