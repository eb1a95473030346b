//! AuditLogEntry - Append-only record of who changed which PVZ

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::AuditOperation;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub operation: AuditOperation,
    pub pvz_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl AuditLogEntry {
    pub fn new(operation: AuditOperation, pvz_id: Uuid, user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            operation,
            pvz_id,
            user_id,
            created_at: Utc::now(),
        }
    }
}
