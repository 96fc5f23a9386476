use common::Receipt;
use moka::future::Cache;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::OpenApi;
use utoipa::ToSchema;

use crate::handlers::products::{CreateProductRequest, ProductResponse, UpdateProductRequest};
use crate::handlers::sessions::{LoginRequest, LoginResponse};
use crate::handlers::users::{BuyRequest, CreateUserRequest, DepositRequest, RoleResponse, UserResponse};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Session token to user id, so authenticated requests skip the token lookup
    pub cache: Cache<String, i32>,
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::sessions::login,
        crate::handlers::users::create_user,
        crate::handlers::users::get_users,
        crate::handlers::users::get_user_roles,
        crate::handlers::users::add_user_role,
        crate::handlers::users::deposit,
        crate::handlers::users::buy,
        crate::handlers::users::reset_deposit,
        crate::handlers::products::get_products,
        crate::handlers::products::create_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,
    ),
    components(
        schemas(
            ApiResponse<UserResponse>,
            ApiResponse<Vec<UserResponse>>,
            ApiResponse<Vec<RoleResponse>>,
            ApiResponse<ProductResponse>,
            ApiResponse<Vec<ProductResponse>>,
            ApiResponse<LoginResponse>,
            ApiResponse<Receipt>,
            ErrorResponse,
            HealthResponse,
            LoginRequest,
            LoginResponse,
            CreateUserRequest,
            UserResponse,
            RoleResponse,
            DepositRequest,
            BuyRequest,
            Receipt,
            CreateProductRequest,
            UpdateProductRequest,
            ProductResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sessions", description = "Login and session tokens"),
        (name = "users", description = "User accounts, roles, deposits and purchases"),
        (name = "products", description = "Products managed by sellers"),
    ),
    info(
        title = "Vending API",
        description = "Vending machine backend - sellers stock products, buyers deposit coins and purchase them",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
