//! AuditOperation - Kind of change recorded in the audit log

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditOperation {
    PvzCreate,
    PvzUpdate,
    PvzDelete,
}

impl AuditOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditOperation::PvzCreate => "pvz_create",
            AuditOperation::PvzUpdate => "pvz_update",
            AuditOperation::PvzDelete => "pvz_delete",
        }
    }
}

impl std::fmt::Display for AuditOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AuditOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pvz_create" => Ok(AuditOperation::PvzCreate),
            "pvz_update" => Ok(AuditOperation::PvzUpdate),
            "pvz_delete" => Ok(AuditOperation::PvzDelete),
            _ => Err(format!("Unknown audit operation: {}", s)),
        }
    }
}
