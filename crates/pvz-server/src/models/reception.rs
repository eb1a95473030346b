//! Reception DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use pvz::{Reception, ReceptionStatus};

/// Open or close the reception of a PVZ
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceptionRequest {
    pub pvz_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceptionResponse {
    pub id: Uuid,
    pub date_time: DateTime<Utc>,
    pub pvz_id: Uuid,
    #[schema(value_type = String, example = "in_progress")]
    pub status: ReceptionStatus,
}

impl From<Reception> for ReceptionResponse {
    fn from(reception: Reception) -> Self {
        Self {
            id: reception.id,
            date_time: reception.date_time,
            pvz_id: reception.pvz_id,
            status: reception.status,
        }
    }
}
