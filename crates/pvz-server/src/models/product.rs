//! Product DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use pvz::{Product, ProductType};

/// Add a product either to a reception or to whatever reception is open at a PVZ
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub reception_id: Option<Uuid>,
    pub pvz_id: Option<Uuid>,
    #[serde(rename = "type")]
    #[schema(example = "электроника")]
    pub product_type: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchCreateProductsRequest {
    pub reception_id: Uuid,
    #[schema(example = json!(["электроника", "обувь"]))]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: Uuid,
    pub date_time: DateTime<Utc>,
    #[serde(rename = "type")]
    #[schema(value_type = String, example = "электроника")]
    pub product_type: ProductType,
    pub reception_id: Uuid,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            date_time: product.date_time,
            product_type: product.product_type,
            reception_id: product.reception_id,
        }
    }
}
