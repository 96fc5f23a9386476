use model::entities::privilege::PrivilegeName;
use thiserror::Error;

/// Failures of the role/privilege check.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("user {username} has no roles")]
    NoRoles { username: String },

    #[error("user {username} does not have privilege {privilege}")]
    PrivilegeDenied {
        username: String,
        privilege: PrivilegeName,
    },
}

/// Failures of a purchase. None of them leave a partial mutation behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PurchaseError {
    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(i32),

    #[error("product {0} not found")]
    ProductNotFound(i32),

    #[error("buyer {0} not found")]
    BuyerNotFound(i32),

    #[error("balance insufficient: {required} required, {available} available")]
    InsufficientBalance { required: i64, available: i64 },

    #[error("requested quantity {requested} is higher than the available product stock {available}")]
    InsufficientStock { requested: i32, available: i32 },
}

/// Error types for the commerce services
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Authorization error: {0}")]
    Authorization(#[from] AuthError),

    #[error("Purchase error: {0}")]
    Purchase(#[from] PurchaseError),

    /// Malformed input that passed transport-level validation
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0} is not an accepted product cost (5, 10, 20, 50, 100)")]
    InvalidCost(i32),

    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Role {0} not found")]
    RoleNotFound(i32),

    #[error("Product {0} not found")]
    ProductNotFound(i32),

    #[error("Only the seller of product {0} can modify it")]
    NotProductOwner(i32),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}

impl CommerceError {
    /// Stable machine readable kind, surfaced to API clients.
    pub fn code(&self) -> &'static str {
        match self {
            CommerceError::Database(_) => "DATABASE_ERROR",
            CommerceError::Authorization(AuthError::NoRoles { .. }) => "NO_ROLES",
            CommerceError::Authorization(AuthError::PrivilegeDenied { .. }) => "PRIVILEGE_DENIED",
            CommerceError::Purchase(PurchaseError::InvalidQuantity(_)) => "INVALID_QUANTITY",
            CommerceError::Purchase(PurchaseError::ProductNotFound(_)) => "PRODUCT_NOT_FOUND",
            CommerceError::Purchase(PurchaseError::BuyerNotFound(_)) => "USER_NOT_FOUND",
            CommerceError::Purchase(PurchaseError::InsufficientBalance { .. }) => "INSUFFICIENT_BALANCE",
            CommerceError::Purchase(PurchaseError::InsufficientStock { .. }) => "INSUFFICIENT_STOCK",
            CommerceError::Validation(_) => "VALIDATION_ERROR",
            CommerceError::InvalidCost(_) => "INVALID_COST",
            CommerceError::UsernameTaken(_) => "USERNAME_ALREADY_EXISTS",
            CommerceError::UserNotFound(_) => "USER_NOT_FOUND",
            CommerceError::RoleNotFound(_) => "ROLE_NOT_FOUND",
            CommerceError::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            CommerceError::NotProductOwner(_) => "NOT_PRODUCT_OWNER",
            CommerceError::InvalidCredentials => "INVALID_CREDENTIALS",
            CommerceError::InvalidToken => "INVALID_TOKEN",
            CommerceError::PasswordHash(_) => "PASSWORD_HASH_ERROR",
        }
    }
}

/// Type alias for Result with CommerceError
pub type Result<T> = std::result::Result<T, CommerceError>;
