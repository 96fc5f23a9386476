use crate::handlers::{
    health::health_check,
    products::{create_product, delete_product, get_products, update_product},
    sessions::login,
    users::{add_user_role, buy, create_user, deposit, get_user_roles, get_users, reset_deposit},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Sessions
        .route("/login", post(login))
        // Users
        .route("/api/v1/users", post(create_user).get(get_users))
        .route("/api/v1/users/roles", get(get_user_roles))
        .route("/api/v1/users/roles/:role_id", post(add_user_role))
        .route("/api/v1/users/deposit", post(deposit))
        .route("/api/v1/users/buy", post(buy))
        .route("/api/v1/users/reset", post(reset_deposit))
        // Products
        .route("/api/v1/products", get(get_products).post(create_product))
        .route("/api/v1/products/:product_id", put(update_product).delete(delete_product))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
