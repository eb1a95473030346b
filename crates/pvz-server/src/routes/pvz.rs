//! PVZ Routes
//!
//! HTTP handlers that delegate to PvzService, plus the PVZ-scoped shortcuts
//! for closing a reception and undoing the latest scan.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use pvz::Pvz;

use super::error::ApiResult;
use crate::auth::AuthUser;
use crate::models::{
    AuditEntryResponse, ErrorResponse, ProductResponse, PvzListQuery, PvzRequest, PvzResponse,
    PvzWithReceptionsResponse, ReceptionResponse, WindowQuery,
};
use crate::AppState;

/// Create a PVZ
#[utoipa::path(
    post,
    path = "/pvz",
    request_body = PvzRequest,
    responses(
        (status = 201, description = "PVZ created", body = PvzResponse),
        (status = 400, description = "Invalid city", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 409, description = "City already has a PVZ", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "PVZ"
)]
pub async fn create_pvz(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<PvzRequest>,
) -> ApiResult<(StatusCode, Json<PvzResponse>)> {
    user.require(user.role.can_manage_pvz(), "create PVZ")?;
    let pvz = state.pvz_service.create(&payload.city, user.user_id).await?;

    Ok((StatusCode::CREATED, Json(pvz.into())))
}

/// One page of PVZs with their receptions and products
#[utoipa::path(
    get,
    path = "/pvz",
    params(PvzListQuery),
    responses(
        (status = 200, description = "PVZ page", body = Vec<PvzWithReceptionsResponse>),
        (status = 400, description = "Invalid window", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "PVZ"
)]
pub async fn list_pvz(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<PvzListQuery>,
) -> ApiResult<Json<Vec<PvzWithReceptionsResponse>>> {
    user.require(user.role.can_view_pvz(), "list PVZ")?;
    let page = state
        .pvz_service
        .get_with_receptions(query.start_date, query.end_date, query.page, query.limit)
        .await?;

    Ok(Json(page.into_iter().map(Into::into).collect()))
}

/// Every PVZ, newest first
#[utoipa::path(
    get,
    path = "/pvz/all",
    responses(
        (status = 200, description = "All PVZs", body = Vec<PvzResponse>)
    ),
    security(("bearer" = [])),
    tag = "PVZ"
)]
pub async fn list_all_pvz(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Vec<PvzResponse>>> {
    user.require(user.role.can_view_pvz(), "list PVZ")?;
    let all = state.pvz_service.get_all().await?;

    Ok(Json(all.into_iter().map(Into::into).collect()))
}

/// A window of PVZs without their receptions, newest first
#[utoipa::path(
    get,
    path = "/pvz/list",
    params(WindowQuery),
    responses(
        (status = 200, description = "PVZ window", body = Vec<PvzResponse>),
        (status = 400, description = "Invalid window", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "PVZ"
)]
pub async fn list_pvz_window(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(window): Query<WindowQuery>,
) -> ApiResult<Json<Vec<PvzResponse>>> {
    user.require(user.role.can_view_pvz(), "list PVZ")?;
    let pvz = state.pvz_service.list(window.offset, window.limit).await?;

    Ok(Json(pvz.into_iter().map(Into::into).collect()))
}

/// Get a PVZ by ID
#[utoipa::path(
    get,
    path = "/pvz/{id}",
    params(("id" = Uuid, Path, description = "PVZ ID")),
    responses(
        (status = 200, description = "PVZ found", body = PvzResponse),
        (status = 404, description = "PVZ not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "PVZ"
)]
pub async fn get_pvz(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PvzResponse>> {
    user.require(user.role.can_view_pvz(), "view PVZ")?;
    let pvz = state.pvz_service.get_by_id(id).await?;

    Ok(Json(pvz.into()))
}

/// Rename a PVZ
#[utoipa::path(
    put,
    path = "/pvz/{id}",
    params(("id" = Uuid, Path, description = "PVZ ID")),
    request_body = PvzRequest,
    responses(
        (status = 200, description = "PVZ updated", body = PvzResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "PVZ not found", body = ErrorResponse),
        (status = 409, description = "City already has a PVZ", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "PVZ"
)]
pub async fn update_pvz(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PvzRequest>,
) -> ApiResult<Json<PvzResponse>> {
    user.require(user.role.can_manage_pvz(), "update PVZ")?;
    let current = state.pvz_service.get_by_id(id).await?;
    let pvz = state
        .pvz_service
        .update(
            Pvz {
                city: payload.city,
                ..current
            },
            user.user_id,
        )
        .await?;

    Ok(Json(pvz.into()))
}

/// Delete a PVZ with its receptions and products
#[utoipa::path(
    delete,
    path = "/pvz/{id}",
    params(("id" = Uuid, Path, description = "PVZ ID")),
    responses(
        (status = 204, description = "PVZ deleted"),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "PVZ not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "PVZ"
)]
pub async fn delete_pvz(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    user.require(user.role.can_manage_pvz(), "delete PVZ")?;
    state.pvz_service.delete(id, user.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Audit history of a PVZ
#[utoipa::path(
    get,
    path = "/pvz/{id}/audit",
    params(("id" = Uuid, Path, description = "PVZ ID")),
    responses(
        (status = 200, description = "Audit entries, oldest first", body = Vec<AuditEntryResponse>),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "PVZ"
)]
pub async fn get_pvz_audit(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<AuditEntryResponse>>> {
    user.require(user.role.can_manage_pvz(), "read PVZ audit log")?;
    let entries = state.pvz_service.audit_history(id, user.user_id).await?;

    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

/// The in-progress reception of a PVZ
#[utoipa::path(
    get,
    path = "/pvz/{id}/reception",
    params(("id" = Uuid, Path, description = "PVZ ID")),
    responses(
        (status = 200, description = "Open reception", body = ReceptionResponse),
        (status = 404, description = "No reception in progress", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "PVZ"
)]
pub async fn get_open_reception(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ReceptionResponse>> {
    user.require(user.role.can_view_pvz(), "view reception")?;
    let reception = state.reception_service.get_open_by_pvz_id(id).await?;

    Ok(Json(reception.into()))
}

/// Close the in-progress reception of a PVZ
#[utoipa::path(
    post,
    path = "/pvz/{id}/close_last_reception",
    params(("id" = Uuid, Path, description = "PVZ ID")),
    responses(
        (status = 200, description = "Reception closed", body = ReceptionResponse),
        (status = 404, description = "No reception to close", body = ErrorResponse),
        (status = 409, description = "Reception already closed", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "PVZ"
)]
pub async fn close_last_reception(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ReceptionResponse>> {
    user.require(user.role.can_operate_receptions(), "close reception")?;
    let reception = state.reception_service.close(id).await?;

    Ok(Json(reception.into()))
}

/// Remove the latest product of the reception open at a PVZ
#[utoipa::path(
    post,
    path = "/pvz/{id}/delete_last_product",
    params(("id" = Uuid, Path, description = "PVZ ID")),
    responses(
        (status = 200, description = "Product removed", body = ProductResponse),
        (status = 404, description = "No open reception or no products", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "PVZ"
)]
pub async fn delete_last_product_for_pvz(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProductResponse>> {
    user.require(user.role.can_operate_receptions(), "delete product")?;
    let product = state.product_service.delete_last_for_pvz(id).await?;

    Ok(Json(product.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pvz", get(list_pvz).post(create_pvz))
        .route("/pvz/all", get(list_all_pvz))
        .route("/pvz/list", get(list_pvz_window))
        .route("/pvz/:id", get(get_pvz).put(update_pvz).delete(delete_pvz))
        .route("/pvz/:id/audit", get(get_pvz_audit))
        .route("/pvz/:id/reception", get(get_open_reception))
        .route("/pvz/:id/close_last_reception", post(close_last_reception))
        .route("/pvz/:id/delete_last_product", post(delete_last_product_for_pvz))
}
