//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::models::{
    AuditEntryResponse,
    BatchCreateProductsRequest,
    CreateProductRequest,
    // Auth models
    DummyLoginRequest,
    ErrorResponse,
    LoginRequest,
    ProductResponse,
    // PVZ models
    PvzRequest,
    PvzResponse,
    PvzWithReceptionsResponse,
    // Reception models
    ReceptionRequest,
    ReceptionResponse,
    ReceptionWithProductsResponse,
    RegisterRequest,
    TokenResponse,
    UserResponse,
};

/// Registers the bearer token scheme referenced by protected paths
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth endpoints
        super::auth::dummy_login,
        super::auth::register,
        super::auth::login,
        // PVZ endpoints
        super::pvz::create_pvz,
        super::pvz::list_pvz,
        super::pvz::list_all_pvz,
        super::pvz::list_pvz_window,
        super::pvz::get_pvz,
        super::pvz::update_pvz,
        super::pvz::delete_pvz,
        super::pvz::get_pvz_audit,
        super::pvz::get_open_reception,
        super::pvz::close_last_reception,
        super::pvz::delete_last_product_for_pvz,
        // Reception endpoints
        super::reception::list_receptions,
        super::reception::create_reception,
        super::reception::close_reception,
        super::reception::get_reception,
        super::reception::list_reception_products,
        // Product endpoints
        super::product::list_products,
        super::product::create_product,
        super::product::create_products_batch,
        super::product::delete_last_product,
        super::product::get_product,
    ),
    info(
        title = "PVZ API",
        version = "0.1.0",
        description = "Pickup points, goods receptions and scanned products.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Auth", description = "Tokens and user registration"),
        (name = "PVZ", description = "Pickup point management"),
        (name = "Reception", description = "Opening and closing receptions"),
        (name = "Product", description = "Scanning products into a reception"),
    ),
    components(
        schemas(
            ErrorResponse,
            // Auth
            DummyLoginRequest,
            RegisterRequest,
            LoginRequest,
            TokenResponse,
            UserResponse,
            // PVZ
            PvzRequest,
            PvzResponse,
            PvzWithReceptionsResponse,
            ReceptionWithProductsResponse,
            AuditEntryResponse,
            // Reception
            ReceptionRequest,
            ReceptionResponse,
            // Product
            CreateProductRequest,
            BatchCreateProductsRequest,
            ProductResponse,
        )
    ),
    modifiers(&BearerAuth),
)]
pub struct ApiDoc;
