//! Domain Errors
//!
//! Error types for domain operations. Every kind carries enough structured
//! context for the transport layer to build a stable response without parsing
//! the message.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::value_objects::Role;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} already exists: {key}")]
    AlreadyExists { entity: &'static str, key: String },

    #[error("PVZ {pvz_id} already has a reception in progress")]
    AlreadyOpen { pvz_id: Uuid },

    #[error("Reception {reception_id} is already closed")]
    AlreadyClosed { reception_id: Uuid },

    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Access denied: role {role} may not {action}")]
    AccessDenied { role: Role, action: &'static str },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found<T: ToString>(entity: &'static str, id: T) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn already_exists<T: ToString>(entity: &'static str, key: T) -> Self {
        Self::AlreadyExists {
            entity,
            key: key.to_string(),
        }
    }

    pub fn invalid<T: Into<String>>(field: &'static str, reason: T) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub fn internal<T: ToString>(err: T) -> Self {
        Self::Internal(err.to_string())
    }

    /// Stable machine-readable code for this error kind
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::NotFound { .. } => "not_found",
            DomainError::AlreadyExists { .. } => "already_exists",
            DomainError::AlreadyOpen { .. } => "already_open",
            DomainError::AlreadyClosed { .. } => "already_closed",
            DomainError::InvalidInput { .. } => "invalid_input",
            DomainError::AccessDenied { .. } => "access_denied",
            DomainError::Unauthorized(_) => "unauthorized",
            DomainError::Cancelled => "cancelled",
            DomainError::Internal(_) => "internal",
        }
    }

    /// Whether the message may be shown verbatim to the caller
    pub fn is_client_safe(&self) -> bool {
        !matches!(self, DomainError::Internal(_))
    }
}
