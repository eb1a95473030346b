//! Offset/limit window for the flat listings

use serde::Deserialize;
use utoipa::IntoParams;

fn default_limit() -> i64 {
    10
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WindowQuery {
    #[serde(default)]
    #[param(default = 0, minimum = 0)]
    pub offset: i64,
    #[serde(default = "default_limit")]
    #[param(default = 10, minimum = 1)]
    pub limit: i64,
}
