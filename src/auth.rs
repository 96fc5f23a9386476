//! Resolves the `token` request header to the authenticated user.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::Json,
};
use commerce::{AuthorizationChecker, CommerceError, SessionService};
use model::entities::{privilege::PrivilegeName, user};
use tracing::{debug, trace, warn};

use crate::handlers::{ApiError, error_response};
use crate::schemas::{AppState, ErrorResponse};

pub const TOKEN_HEADER: &str = "token";

/// The user owning the request's session token.
///
/// The user row is always read fresh; only the token to id mapping is cached.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub user::Model);

impl CurrentUser {
    /// Fails with 403 unless one of the user's roles grants `privilege`.
    pub async fn require(&self, state: &AppState, privilege: PrivilegeName) -> Result<(), ApiError> {
        AuthorizationChecker::new(&state.db)
            .check(&self.0, privilege)
            .await
            .map_err(error_response)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = parts
            .headers
            .get(TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
        else {
            debug!("Request without session token");
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "Missing session token".to_string(),
                    code: "MISSING_TOKEN".to_string(),
                    success: false,
                }),
            ));
        };

        let sessions = SessionService::new(&state.db);

        let user_id = match state.cache.get(token).await {
            Some(user_id) => {
                trace!("Token cache hit for user {}", user_id);
                user_id
            }
            None => {
                let user_id = sessions.user_id_for(token).await.map_err(|e| {
                    warn!("Rejected session token: {}", e);
                    error_response(e)
                })?;
                state.cache.insert(token.to_string(), user_id).await;
                user_id
            }
        };

        match sessions.user_by_id(user_id).await {
            Ok(user) => Ok(CurrentUser(user)),
            Err(e @ CommerceError::InvalidToken) => {
                state.cache.invalidate(token).await;
                Err(error_response(e))
            }
            Err(e) => Err(error_response(e)),
        }
    }
}
