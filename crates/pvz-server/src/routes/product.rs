//! Product Routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use pvz::DomainError;

use super::error::ApiResult;
use crate::auth::AuthUser;
use crate::models::{
    BatchCreateProductsRequest, CreateProductRequest, ErrorResponse, ProductResponse, WindowQuery,
};
use crate::AppState;

/// Add a product to a reception, or to the reception open at a PVZ
#[utoipa::path(
    post,
    path = "/product",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product added", body = ProductResponse),
        (status = 400, description = "Unknown type or no target given", body = ErrorResponse),
        (status = 404, description = "Reception or PVZ not found", body = ErrorResponse),
        (status = 409, description = "Reception already closed", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Product"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<ProductResponse>)> {
    user.require(user.role.can_operate_receptions(), "add product")?;

    let product = match (payload.reception_id, payload.pvz_id) {
        (Some(reception_id), _) => {
            state
                .product_service
                .create(reception_id, &payload.product_type)
                .await?
        }
        (None, Some(pvz_id)) => {
            state
                .product_service
                .create_for_pvz(pvz_id, &payload.product_type)
                .await?
        }
        (None, None) => {
            return Err(
                DomainError::invalid("receptionId", "receptionId or pvzId is required").into(),
            )
        }
    };

    Ok((StatusCode::CREATED, Json(product.into())))
}

/// Add several products to a reception; all or none are stored
#[utoipa::path(
    post,
    path = "/product/batch",
    request_body = BatchCreateProductsRequest,
    responses(
        (status = 201, description = "Products added in order", body = Vec<ProductResponse>),
        (status = 400, description = "Empty batch or unknown type", body = ErrorResponse),
        (status = 409, description = "Reception already closed", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Product"
)]
pub async fn create_products_batch(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<BatchCreateProductsRequest>,
) -> ApiResult<(StatusCode, Json<Vec<ProductResponse>>)> {
    user.require(user.role.can_operate_receptions(), "add products")?;
    let products = state
        .product_service
        .create_batch(payload.reception_id, payload.types)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(products.into_iter().map(Into::into).collect()),
    ))
}

/// Remove the most recently scanned product of a reception
#[utoipa::path(
    delete,
    path = "/product/last/{reception_id}",
    params(("reception_id" = Uuid, Path, description = "Reception ID")),
    responses(
        (status = 200, description = "Product removed", body = ProductResponse),
        (status = 404, description = "Reception not found or empty", body = ErrorResponse),
        (status = 409, description = "Reception already closed", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Product"
)]
pub async fn delete_last_product(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(reception_id): Path<Uuid>,
) -> ApiResult<Json<ProductResponse>> {
    user.require(user.role.can_operate_receptions(), "delete product")?;
    let product = state.product_service.delete_last(reception_id).await?;

    Ok(Json(product.into()))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/product/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Product"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProductResponse>> {
    user.require(user.role.can_view_pvz(), "view product")?;
    let product = state.product_service.get_by_id(id).await?;

    Ok(Json(product.into()))
}

/// A window of products, newest first
#[utoipa::path(
    get,
    path = "/product",
    params(WindowQuery),
    responses(
        (status = 200, description = "Product window", body = Vec<ProductResponse>),
        (status = 400, description = "Invalid window", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Product"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(window): Query<WindowQuery>,
) -> ApiResult<Json<Vec<ProductResponse>>> {
    user.require(user.role.can_view_pvz(), "list products")?;
    let products = state
        .product_service
        .list(window.offset, window.limit)
        .await?;

    Ok(Json(products.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/product", get(list_products).post(create_product))
        .route("/product/batch", post(create_products_batch))
        .route("/product/last/:reception_id", delete(delete_last_product))
        .route("/product/:id", get(get_product))
}
