//! ReceptionStatus - Lifecycle state of a reception

use serde::{Deserialize, Serialize};

/// Reception status. `InProgress -> Closed` is the only transition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReceptionStatus {
    #[default]
    InProgress,
    Closed,
}

impl ReceptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceptionStatus::InProgress => "in_progress",
            ReceptionStatus::Closed => "closed",
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, ReceptionStatus::InProgress)
    }
}

impl std::fmt::Display for ReceptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReceptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in_progress" => Ok(ReceptionStatus::InProgress),
            "closed" | "close" => Ok(ReceptionStatus::Closed),
            _ => Err(format!("Unknown reception status: {}", s)),
        }
    }
}
