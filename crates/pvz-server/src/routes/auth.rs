//! Authentication Routes
//!
//! Public endpoints that hand out bearer tokens.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use pvz::DomainError;

use super::error::ApiResult;
use crate::models::{
    DummyLoginRequest, ErrorResponse, LoginRequest, RegisterRequest, TokenResponse, UserResponse,
};
use crate::AppState;

/// Token for the shared user of a role
#[utoipa::path(
    post,
    path = "/dummyLogin",
    request_body = DummyLoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Invalid role", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn dummy_login(
    State(state): State<AppState>,
    Json(payload): Json<DummyLoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let user = state.user_service.dummy_login(payload.role).await?;
    let token = state
        .jwt
        .generate_token(user.id, user.role)
        .map_err(DomainError::from)?;

    Ok(Json(TokenResponse { token }))
}

/// Register a user
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid email or password", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .user_service
        .register(&payload.email, &payload.password, payload.role)
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let user = state
        .user_service
        .login(&payload.email, &payload.password)
        .await?;
    let token = state
        .jwt
        .generate_token(user.id, user.role)
        .map_err(DomainError::from)?;

    Ok(Json(TokenResponse { token }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dummyLogin", post(dummy_login))
        .route("/register", post(register))
        .route("/login", post(login))
}
