pub mod health;
pub mod products;
pub mod sessions;
pub mod users;

use axum::{http::StatusCode, response::Json};
use commerce::{AuthError, CommerceError, PurchaseError};
use tracing::error;

use crate::schemas::ErrorResponse;

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn status_of(err: &CommerceError) -> StatusCode {
    match err {
        CommerceError::Database(_) | CommerceError::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        CommerceError::Authorization(AuthError::NoRoles { .. })
        | CommerceError::Authorization(AuthError::PrivilegeDenied { .. }) => StatusCode::FORBIDDEN,
        CommerceError::Purchase(PurchaseError::InvalidQuantity(_)) => StatusCode::BAD_REQUEST,
        CommerceError::Purchase(PurchaseError::ProductNotFound(_))
        | CommerceError::Purchase(PurchaseError::BuyerNotFound(_)) => StatusCode::NOT_FOUND,
        CommerceError::Purchase(PurchaseError::InsufficientBalance { .. }) => StatusCode::PAYMENT_REQUIRED,
        CommerceError::Purchase(PurchaseError::InsufficientStock { .. }) => StatusCode::CONFLICT,
        CommerceError::Validation(_) | CommerceError::InvalidCost(_) => StatusCode::BAD_REQUEST,
        CommerceError::UsernameTaken(_) => StatusCode::CONFLICT,
        CommerceError::UserNotFound(_) | CommerceError::RoleNotFound(_) | CommerceError::ProductNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        CommerceError::NotProductOwner(_) => StatusCode::FORBIDDEN,
        CommerceError::InvalidCredentials | CommerceError::InvalidToken => StatusCode::UNAUTHORIZED,
    }
}

/// Turn a service error into the JSON error body.
///
/// Internal failures are logged with their cause and reported generically.
pub fn error_response(err: CommerceError) -> ApiError {
    let status = status_of(&err);
    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("Internal error: {}", err);
        "Internal server error".to_string()
    } else {
        err.to_string()
    };

    (
        status,
        Json(ErrorResponse {
            error: message,
            code: err.code().to_string(),
            success: false,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::entities::privilege::PrivilegeName;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                CommerceError::from(AuthError::NoRoles {
                    username: "a".to_string(),
                }),
                StatusCode::FORBIDDEN,
            ),
            (
                CommerceError::from(AuthError::PrivilegeDenied {
                    username: "a".to_string(),
                    privilege: PrivilegeName::ProductBuy,
                }),
                StatusCode::FORBIDDEN,
            ),
            (PurchaseError::InvalidQuantity(0).into(), StatusCode::BAD_REQUEST),
            (PurchaseError::ProductNotFound(1).into(), StatusCode::NOT_FOUND),
            (
                PurchaseError::InsufficientBalance {
                    required: 10,
                    available: 5,
                }
                .into(),
                StatusCode::PAYMENT_REQUIRED,
            ),
            (
                PurchaseError::InsufficientStock {
                    requested: 2,
                    available: 1,
                }
                .into(),
                StatusCode::CONFLICT,
            ),
            (CommerceError::InvalidCost(3), StatusCode::BAD_REQUEST),
            (CommerceError::InvalidToken, StatusCode::UNAUTHORIZED),
        ];

        for (err, expected) in cases {
            assert_eq!(status_of(&err), expected, "{}", err);
        }
    }

    #[test]
    fn test_internal_errors_are_not_leaked() {
        let (status, Json(body)) = error_response(CommerceError::Database(sea_orm::DbErr::Custom(
            "disk on fire".to_string(),
        )));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "DATABASE_ERROR");
        assert!(!body.error.contains("disk on fire"));
        assert!(!body.success);
    }
}
