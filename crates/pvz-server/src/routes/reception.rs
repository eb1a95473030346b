//! Reception Routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use super::error::ApiResult;
use crate::auth::AuthUser;
use crate::models::{
    ErrorResponse, ProductResponse, ReceptionRequest, ReceptionResponse, WindowQuery,
};
use crate::AppState;

/// Open a reception at a PVZ
#[utoipa::path(
    post,
    path = "/reception",
    request_body = ReceptionRequest,
    responses(
        (status = 201, description = "Reception opened", body = ReceptionResponse),
        (status = 403, description = "Not an employee", body = ErrorResponse),
        (status = 404, description = "PVZ not found", body = ErrorResponse),
        (status = 409, description = "A reception is already in progress", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Reception"
)]
pub async fn create_reception(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ReceptionRequest>,
) -> ApiResult<(StatusCode, Json<ReceptionResponse>)> {
    user.require(user.role.can_operate_receptions(), "open reception")?;
    let reception = state.reception_service.create(payload.pvz_id).await?;

    Ok((StatusCode::CREATED, Json(reception.into())))
}

/// Close the in-progress reception of a PVZ
#[utoipa::path(
    post,
    path = "/reception/close",
    request_body = ReceptionRequest,
    responses(
        (status = 200, description = "Reception closed", body = ReceptionResponse),
        (status = 404, description = "No reception to close", body = ErrorResponse),
        (status = 409, description = "Reception already closed", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Reception"
)]
pub async fn close_reception(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ReceptionRequest>,
) -> ApiResult<Json<ReceptionResponse>> {
    user.require(user.role.can_operate_receptions(), "close reception")?;
    let reception = state.reception_service.close(payload.pvz_id).await?;

    Ok(Json(reception.into()))
}

/// Get a reception by ID
#[utoipa::path(
    get,
    path = "/reception/{id}",
    params(("id" = Uuid, Path, description = "Reception ID")),
    responses(
        (status = 200, description = "Reception found", body = ReceptionResponse),
        (status = 404, description = "Reception not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Reception"
)]
pub async fn get_reception(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ReceptionResponse>> {
    user.require(user.role.can_view_pvz(), "view reception")?;
    let reception = state.reception_service.get_by_id(id).await?;

    Ok(Json(reception.into()))
}

/// Products of a reception in scan order
#[utoipa::path(
    get,
    path = "/reception/{id}/products",
    params(("id" = Uuid, Path, description = "Reception ID")),
    responses(
        (status = 200, description = "Products", body = Vec<ProductResponse>),
        (status = 404, description = "Reception not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Reception"
)]
pub async fn list_reception_products(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<ProductResponse>>> {
    user.require(user.role.can_view_pvz(), "view products")?;
    let products = state.product_service.get_by_reception_id(id).await?;

    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// A window of receptions, newest first
#[utoipa::path(
    get,
    path = "/reception",
    params(WindowQuery),
    responses(
        (status = 200, description = "Reception window", body = Vec<ReceptionResponse>),
        (status = 400, description = "Invalid window", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Reception"
)]
pub async fn list_receptions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(window): Query<WindowQuery>,
) -> ApiResult<Json<Vec<ReceptionResponse>>> {
    user.require(user.role.can_view_pvz(), "list receptions")?;
    let receptions = state
        .reception_service
        .list(window.offset, window.limit)
        .await?;

    Ok(Json(receptions.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reception", get(list_receptions).post(create_reception))
        .route("/reception/close", post(close_reception))
        .route("/reception/:id", get(get_reception))
        .route("/reception/:id/products", get(list_reception_products))
}
