//! Error body shared by every endpoint

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Stable machine-readable code, e.g. `already_open`
    #[schema(example = "already_open")]
    pub code: String,
    pub message: String,
}
