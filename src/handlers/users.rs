use crate::auth::CurrentUser;
use crate::handlers::{ApiError, error_response};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use commerce::{AccountService, NewAccount, PurchaseTransaction};
use common::Receipt;
use model::entities::{privilege::PrivilegeName, role, user};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for registering a new user
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateUserRequest {
    /// Username (must be unique)
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
    /// Starting balance, defaults to 0
    #[validate(range(min = 0))]
    pub deposit: Option<i64>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct DepositRequest {
    #[validate(range(min = 1))]
    pub amount: i64,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct BuyRequest {
    pub product_id: i32,
    /// Number of items, at least 1
    pub quantity: i32,
}

/// User response model. The password hash is never exposed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub deposit: i64,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            deposit: model.deposit,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoleResponse {
    pub id: i32,
    pub name: String,
}

impl From<role::Model> for RoleResponse {
    fn from(model: role::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

fn roles_response(roles: Vec<role::Model>) -> Vec<RoleResponse> {
    roles.into_iter().map(RoleResponse::from).collect()
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Username already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(username = %request.username))]
pub async fn create_user(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateUserRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    let created = AccountService::new(&state.db)
        .register(NewAccount {
            username: request.username,
            password: request.password,
            deposit: request.deposit,
        })
        .await
        .map_err(error_response)?;

    info!("User created successfully with ID: {}", created.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(UserResponse::from(created), "User created successfully")),
    ))
}

/// Get all users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<Vec<UserResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<UserResponse>>>), ApiError> {
    let users = AccountService::new(&state.db)
        .list_users()
        .await
        .map_err(error_response)?;

    debug!("Retrieved {} users", users.len());
    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            users.into_iter().map(UserResponse::from).collect(),
            "Users retrieved successfully",
        )),
    ))
}

/// Roles of the logged in user
#[utoipa::path(
    get,
    path = "/api/v1/users/roles",
    tag = "users",
    params(("token" = String, Header, description = "Session token")),
    responses(
        (status = 200, description = "Roles retrieved successfully", body = ApiResponse<Vec<RoleResponse>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.0.id))]
pub async fn get_user_roles(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<(StatusCode, Json<ApiResponse<Vec<RoleResponse>>>), ApiError> {
    let roles = AccountService::new(&state.db)
        .user_roles(&user.0)
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(roles_response(roles), "Roles retrieved successfully")),
    ))
}

/// Attach a role to the logged in user
#[utoipa::path(
    post,
    path = "/api/v1/users/roles/{role_id}",
    tag = "users",
    params(
        ("role_id" = i32, Path, description = "Role ID"),
        ("token" = String, Header, description = "Session token"),
    ),
    responses(
        (status = 200, description = "Role added", body = ApiResponse<Vec<RoleResponse>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Role not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.0.id))]
pub async fn add_user_role(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(role_id): Path<i32>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<RoleResponse>>>), ApiError> {
    let roles = AccountService::new(&state.db)
        .add_role(&user.0, role_id)
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(roles_response(roles), "Role added successfully")),
    ))
}

/// Add coins to the logged in user's deposit
#[utoipa::path(
    post,
    path = "/api/v1/users/deposit",
    tag = "users",
    request_body = DepositRequest,
    params(("token" = String, Header, description = "Session token")),
    responses(
        (status = 200, description = "Deposit updated", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid amount"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "USER_DEPOSIT privilege required", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.0.id))]
pub async fn deposit(
    State(state): State<AppState>,
    user: CurrentUser,
    Valid(Json(request)): Valid<Json<DepositRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    user.require(&state, PrivilegeName::UserDeposit).await?;

    let updated = AccountService::new(&state.db)
        .deposit(&user.0, request.amount)
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(UserResponse::from(updated), "Deposit updated successfully")),
    ))
}

/// Buy a product with the logged in user's deposit
#[utoipa::path(
    post,
    path = "/api/v1/users/buy",
    tag = "users",
    request_body = BuyRequest,
    params(("token" = String, Header, description = "Session token")),
    responses(
        (status = 200, description = "Purchase completed", body = ApiResponse<Receipt>),
        (status = 400, description = "Invalid quantity", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 402, description = "Deposit too low", body = ErrorResponse),
        (status = 403, description = "PRODUCT_BUY privilege required", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 409, description = "Not enough stock", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.0.id))]
pub async fn buy(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<BuyRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Receipt>>), ApiError> {
    user.require(&state, PrivilegeName::ProductBuy).await?;

    let receipt = PurchaseTransaction::new(&state.db)
        .purchase(user.0.id, request.product_id, request.quantity)
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(receipt, "Purchase completed successfully")),
    ))
}

/// Set the logged in user's deposit back to 0
#[utoipa::path(
    post,
    path = "/api/v1/users/reset",
    tag = "users",
    params(("token" = String, Header, description = "Session token")),
    responses(
        (status = 200, description = "Deposit reset", body = ApiResponse<UserResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.0.id))]
pub async fn reset_deposit(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    let updated = AccountService::new(&state.db)
        .reset_deposit(&user.0)
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(UserResponse::from(updated), "Deposit reset successfully")),
    ))
}
