use crate::handlers::{ApiError, error_response};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{extract::State, http::StatusCode, response::Json};
use axum_valid::Valid;
use commerce::SessionService;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;
use validator::Validate;

/// Credentials for `POST /login`
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Send this value in the `token` header of authenticated requests
    pub token: String,
    pub user_id: i32,
}

/// Log in and receive a session token
///
/// Any token issued earlier for the same user stops working.
#[utoipa::path(
    post,
    path = "/login",
    tag = "sessions",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Wrong username or password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(username = %request.username))]
pub async fn login(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<LoginRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<LoginResponse>>), ApiError> {
    let session = SessionService::new(&state.db)
        .login(&request.username, &request.password)
        .await
        .map_err(error_response)?;

    if let Some(old) = session.replaced.as_deref() {
        debug!("Dropping replaced token of user {} from cache", session.user_id);
        state.cache.invalidate(old).await;
    }
    state.cache.insert(session.token.clone(), session.user_id).await;

    info!("Issued session token for user {}", session.user_id);
    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            LoginResponse {
                token: session.token,
                user_id: session.user_id,
            },
            "Logged in successfully",
        )),
    ))
}
