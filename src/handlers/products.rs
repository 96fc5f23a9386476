use crate::auth::CurrentUser;
use crate::handlers::{ApiError, error_response};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use commerce::{CatalogService, NewProduct, ProductPatch};
use model::entities::{privilege::PrivilegeName, product};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating a product
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(range(min = 0))]
    pub amount_available: i32,
    /// One of 5, 10, 20, 50, 100
    pub cost: i32,
}

/// Request body for updating a product. Omitted fields keep their value.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(max = 255))]
    pub name: Option<String>,
    #[validate(range(min = 0))]
    pub amount_available: Option<i32>,
    pub cost: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: i32,
    pub name: String,
    pub cost: i32,
    pub amount_available: i32,
    pub seller_id: Option<i32>,
}

impl From<product::Model> for ProductResponse {
    fn from(model: product::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            cost: model.cost,
            amount_available: model.amount_available,
            seller_id: model.seller_id,
        }
    }
}

/// Products sold by the logged in user
#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "products",
    params(("token" = String, Header, description = "Session token")),
    responses(
        (status = 200, description = "Products retrieved successfully", body = ApiResponse<Vec<ProductResponse>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.0.id))]
pub async fn get_products(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<(StatusCode, Json<ApiResponse<Vec<ProductResponse>>>), ApiError> {
    let products = CatalogService::new(&state.db)
        .products_by_seller(&user.0)
        .await
        .map_err(error_response)?;

    debug!("User {} sells {} products", user.0.username, products.len());
    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            products.into_iter().map(ProductResponse::from).collect(),
            "Products retrieved successfully",
        )),
    ))
}

/// Add a product
#[utoipa::path(
    post,
    path = "/api/v1/products",
    tag = "products",
    request_body = CreateProductRequest,
    params(("token" = String, Header, description = "Session token")),
    responses(
        (status = 201, description = "Product created successfully", body = ApiResponse<ProductResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "PRODUCT_ADD privilege required", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.0.id))]
pub async fn create_product(
    State(state): State<AppState>,
    user: CurrentUser,
    Valid(Json(request)): Valid<Json<CreateProductRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<ProductResponse>>), ApiError> {
    user.require(&state, PrivilegeName::ProductAdd).await?;

    let created = CatalogService::new(&state.db)
        .create_product(
            &user.0,
            NewProduct {
                name: request.name,
                amount_available: request.amount_available,
                cost: request.cost,
            },
        )
        .await
        .map_err(error_response)?;

    info!("Product created successfully with ID: {}", created.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(ProductResponse::from(created), "Product created successfully")),
    ))
}

/// Update a product owned by the logged in user
#[utoipa::path(
    put,
    path = "/api/v1/products/{product_id}",
    tag = "products",
    request_body = UpdateProductRequest,
    params(
        ("product_id" = i32, Path, description = "Product ID"),
        ("token" = String, Header, description = "Session token"),
    ),
    responses(
        (status = 200, description = "Product updated successfully", body = ApiResponse<ProductResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "PRODUCT_UPDATE privilege required or not the seller", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.0.id))]
pub async fn update_product(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(product_id): Path<i32>,
    Valid(Json(request)): Valid<Json<UpdateProductRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<ProductResponse>>), ApiError> {
    user.require(&state, PrivilegeName::ProductUpdate).await?;

    let updated = CatalogService::new(&state.db)
        .update_product(
            &user.0,
            product_id,
            ProductPatch {
                name: request.name,
                amount_available: request.amount_available,
                cost: request.cost,
            },
        )
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(ProductResponse::from(updated), "Product updated successfully")),
    ))
}

/// Delete a product owned by the logged in user
#[utoipa::path(
    delete,
    path = "/api/v1/products/{product_id}",
    tag = "products",
    params(
        ("product_id" = i32, Path, description = "Product ID"),
        ("token" = String, Header, description = "Session token"),
    ),
    responses(
        (status = 200, description = "Product deleted successfully", body = ApiResponse<ProductResponse>),
        (status = 403, description = "PRODUCT_REMOVE privilege required or not the seller", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.0.id))]
pub async fn delete_product(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(product_id): Path<i32>,
) -> Result<(StatusCode, Json<ApiResponse<ProductResponse>>), ApiError> {
    user.require(&state, PrivilegeName::ProductRemove).await?;

    let deleted = CatalogService::new(&state.db)
        .delete_product(&user.0, product_id)
        .await
        .map_err(error_response)?;

    info!("Product {} deleted", deleted.id);
    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(ProductResponse::from(deleted), "Product deleted successfully")),
    ))
}
