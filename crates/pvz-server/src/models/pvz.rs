//! PVZ DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use pvz::{AuditLogEntry, AuditOperation, Pvz, PvzWithReceptions, ReceptionWithProducts};

use super::{ProductResponse, ReceptionResponse};

/// Create or rename a PVZ
#[derive(Debug, Deserialize, ToSchema)]
pub struct PvzRequest {
    #[schema(example = "Москва")]
    pub city: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PvzResponse {
    pub id: Uuid,
    pub registration_date: DateTime<Utc>,
    pub city: String,
}

impl From<Pvz> for PvzResponse {
    fn from(pvz: Pvz) -> Self {
        Self {
            id: pvz.id,
            registration_date: pvz.created_at,
            city: pvz.city,
        }
    }
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

/// Query of the paginated PVZ listing
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PvzListQuery {
    /// Inclusive lower bound on reception date
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on reception date
    pub end_date: Option<DateTime<Utc>>,
    /// 1-based page number
    #[serde(default = "default_page")]
    #[param(default = 1, minimum = 1)]
    pub page: i64,
    #[serde(default = "default_limit")]
    #[param(default = 10, minimum = 1)]
    pub limit: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReceptionWithProductsResponse {
    pub reception: ReceptionResponse,
    pub products: Vec<ProductResponse>,
}

impl From<ReceptionWithProducts> for ReceptionWithProductsResponse {
    fn from(entry: ReceptionWithProducts) -> Self {
        Self {
            reception: entry.reception.into(),
            products: entry.products.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PvzWithReceptionsResponse {
    pub pvz: PvzResponse,
    pub receptions: Vec<ReceptionWithProductsResponse>,
}

impl From<PvzWithReceptions> for PvzWithReceptionsResponse {
    fn from(entry: PvzWithReceptions) -> Self {
        Self {
            pvz: entry.pvz.into(),
            receptions: entry.receptions.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntryResponse {
    pub id: Uuid,
    #[schema(value_type = String, example = "pvz_create")]
    pub operation_type: AuditOperation,
    pub pvz_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<AuditLogEntry> for AuditEntryResponse {
    fn from(entry: AuditLogEntry) -> Self {
        Self {
            id: entry.id,
            operation_type: entry.operation,
            pvz_id: entry.pvz_id,
            user_id: entry.user_id,
            created_at: entry.created_at,
        }
    }
}
