//! Role - What a user is allowed to do

use serde::{Deserialize, Serialize};

/// User role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Manages PVZ records. Also known as "moderator".
    #[serde(alias = "moderator")]
    Admin,
    /// Operates receptions and scans products
    Employee,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
            Role::User => "user",
        }
    }

    /// Create, update and delete PVZ records
    pub fn can_manage_pvz(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Open and close receptions, add and remove products
    pub fn can_operate_receptions(&self) -> bool {
        matches!(self, Role::Employee)
    }

    /// Read PVZ, receptions and products
    pub fn can_view_pvz(&self) -> bool {
        matches!(self, Role::Admin | Role::Employee)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" | "moderator" => Ok(Role::Admin),
            "employee" => Ok(Role::Employee),
            "user" => Ok(Role::User),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}
