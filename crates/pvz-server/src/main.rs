use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod adapters;
mod application;
mod auth;
mod cache;
mod config;
mod models;
mod routes;

use adapters::PgStore;
use application::{
    ProductService, PvzService, ReceptionService, TransactionCoordinator, UserService,
};
use auth::JwtService;
use cache::EntityCaches;
use config::{Config, DatabaseConfig};

/// Type aliases for application services with the concrete store
pub type AppPvzService = PvzService<PgStore>;
pub type AppReceptionService = ReceptionService<PgStore>;
pub type AppProductService = ProductService<PgStore>;
pub type AppUserService = UserService<PgStore>;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub pvz_service: Arc<AppPvzService>,
    pub reception_service: Arc<AppReceptionService>,
    pub product_service: Arc<AppProductService>,
    pub user_service: Arc<AppUserService>,
    pub jwt: Arc<JwtService>,
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    version: String,
}

async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn connect_override(db: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(db.max_connections)
        .min_connections(db.min_connections)
        .acquire_timeout(db.acquire_timeout)
        .idle_timeout(db.idle_timeout)
        .max_lifetime(db.max_lifetime)
        .connect(&db.url)
        .await
}

/// Build the HTTP router over the shared state
fn app(state: AppState) -> Router {
    // Protected routes (require a bearer token)
    let protected_routes = Router::new()
        .merge(routes::pvz::router())
        .merge(routes::reception::router())
        .merge(routes::product::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    // OpenAPI documentation
    let openapi = routes::swagger::ApiDoc::openapi();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(routes::auth::router())
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing::info!("PVZ API initializing...");

    let config = Config::from_secrets(&secrets);

    let pool = match &config.database {
        Some(db) => {
            tracing::info!("Using DATABASE_URL override (max {} connections)", db.max_connections);
            connect_override(db)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect to DATABASE_URL: {e}"))?
        }
        None => pool,
    };

    // Run migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run database migrations: {e}"))?;

    tracing::info!("Database migrations completed");

    // Ctrl-C rolls back in-flight units of work
    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown requested, cancelling open transactions");
                shutdown.cancel();
            }
        });
    }

    // Initialize application services
    let store = Arc::new(PgStore::new(pool));
    let tx = TransactionCoordinator::new(store, shutdown);
    let caches = EntityCaches::new(config.cache_capacity);

    if caches.pvz.is_enabled() {
        tracing::info!("Entity cache enabled ({} entries per kind)", config.cache_capacity);
    } else {
        tracing::warn!("Entity cache disabled");
    }
    if !config.cities.allowed().is_empty() {
        tracing::info!("City allow-list: {}", config.cities.allowed().join(", "));
    }

    let state = AppState {
        pvz_service: Arc::new(PvzService::new(
            tx.clone(),
            caches.clone(),
            config.cities.clone(),
            config.max_page_limit,
        )),
        reception_service: Arc::new(ReceptionService::new(tx.clone(), caches.clone())),
        product_service: Arc::new(ProductService::new(tx.clone(), caches)),
        user_service: Arc::new(UserService::new(tx)),
        jwt: Arc::new(JwtService::new(config.jwt.clone())),
    };

    let router = app(state);

    tracing::info!("Swagger UI: /swagger-ui");
    tracing::info!("PVZ API ready");

    Ok(router.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use pvz::{CityPolicy, Role};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::auth::JwtConfig;
    use crate::models::ErrorResponse;

    // The pool never connects; these requests are settled before any query
    fn state() -> AppState {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://pvz@localhost/pvz")
            .unwrap();
        let tx = TransactionCoordinator::new(
            Arc::new(PgStore::new(pool)),
            CancellationToken::new(),
        );
        let caches = EntityCaches::new(0);

        AppState {
            pvz_service: Arc::new(PvzService::new(
                tx.clone(),
                caches.clone(),
                CityPolicy::free_form(),
                30,
            )),
            reception_service: Arc::new(ReceptionService::new(tx.clone(), caches.clone())),
            product_service: Arc::new(ProductService::new(tx.clone(), caches)),
            user_service: Arc::new(UserService::new(tx)),
            jwt: Arc::new(JwtService::new(JwtConfig {
                secret: "router-test-secret-at-least-32-bytes".to_string(),
                expiration_minutes: 60,
                issuer: "pvz-server".to_string(),
            })),
        }
    }

    async fn error_body(response: axum::response::Response) -> ErrorResponse {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let response = app(state())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_openapi_document_served() {
        let response = app(state())
            .oneshot(
                Request::get("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let response = app(state())
            .oneshot(Request::get("/pvz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_body(response).await.code, "unauthorized");
    }

    #[tokio::test]
    async fn test_garbage_token_is_unauthorized() {
        let response = app(state())
            .oneshot(
                Request::get("/reception/00000000-0000-0000-0000-000000000000")
                    .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_employee_cannot_create_pvz() {
        let state = state();
        let token = state
            .jwt
            .generate_token(Uuid::new_v4(), Role::Employee)
            .unwrap();

        let response = app(state)
            .oneshot(
                Request::post("/pvz")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"city":"Москва"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(error_body(response).await.code, "access_denied");
    }
}
