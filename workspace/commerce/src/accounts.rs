//! User registration, roles and deposits.

use model::entities::{role, user, user_role};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set, SqlErr,
};
use tracing::{debug, info, instrument, warn};

use crate::error::{CommerceError, Result};
use crate::sessions::hash_password;

/// Input for [`AccountService::register`].
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
    pub deposit: Option<i64>,
}

#[derive(Debug, Clone, Copy)]
pub struct AccountService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AccountService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, account), fields(username = %account.username))]
    pub async fn register(&self, account: NewAccount) -> Result<user::Model> {
        let username = account.username.trim();
        if username.is_empty() || account.password.is_empty() {
            return Err(CommerceError::Validation(
                "username and password are required".to_string(),
            ));
        }

        let deposit = account.deposit.unwrap_or(0);
        if deposit < 0 {
            return Err(CommerceError::Validation(format!(
                "deposit cannot be negative, got {}",
                deposit
            )));
        }

        if self.find_by_username(username).await?.is_some() {
            warn!("Username {} is already taken", username);
            return Err(CommerceError::UsernameTaken(username.to_string()));
        }

        // A concurrent registration can still win the race to the unique index
        let created = user::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(hash_password(&account.password)?),
            deposit: Set(deposit),
            ..Default::default()
        }
        .insert(self.db)
        .await
        .map_err(|err| match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                warn!("Username {} was registered concurrently", username);
                CommerceError::UsernameTaken(username.to_string())
            }
            _ => err.into(),
        })?;

        info!("Registered user {} with id {}", created.username, created.id);
        Ok(created)
    }

    pub async fn list_users(&self) -> Result<Vec<user::Model>> {
        Ok(user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(self.db)
            .await?)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<user::Model>> {
        Ok(user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db)
            .await?)
    }

    pub async fn find_user(&self, user_id: i32) -> Result<user::Model> {
        user::Entity::find_by_id(user_id)
            .one(self.db)
            .await?
            .ok_or_else(|| CommerceError::UserNotFound(user_id.to_string()))
    }

    pub async fn user_roles(&self, user: &user::Model) -> Result<Vec<role::Model>> {
        Ok(user
            .find_related(role::Entity)
            .order_by_asc(role::Column::Id)
            .all(self.db)
            .await?)
    }

    /// Attach a role to the user and return the user's roles.
    ///
    /// Holding a role with the same name already is not an error.
    #[instrument(skip(self, user), fields(user_id = user.id))]
    pub async fn add_role(&self, user: &user::Model, role_id: i32) -> Result<Vec<role::Model>> {
        let role = role::Entity::find_by_id(role_id)
            .one(self.db)
            .await?
            .ok_or(CommerceError::RoleNotFound(role_id))?;

        let held = self.user_roles(user).await?;
        if held.iter().any(|r| r.name == role.name) {
            debug!("User {} already holds role {}", user.username, role.name);
            return Ok(held);
        }

        let membership = user_role::ActiveModel {
            user_id: Set(user.id),
            role_id: Set(role.id),
        };
        let inserted = user_role::Entity::insert(membership)
            .on_conflict(
                OnConflict::columns([user_role::Column::UserId, user_role::Column::RoleId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;
        if inserted == 0 {
            debug!("Role {} was attached to user {} concurrently", role.name, user.username);
            return self.user_roles(user).await;
        }

        info!("Added role {} to user {}", role.name, user.username);
        self.user_roles(user).await
    }

    /// Add `amount` to the user's deposit and return the updated user.
    #[instrument(skip(self, user), fields(user_id = user.id))]
    pub async fn deposit(&self, user: &user::Model, amount: i64) -> Result<user::Model> {
        if amount < 1 {
            return Err(CommerceError::Validation(format!(
                "deposit amount must be at least 1, got {}",
                amount
            )));
        }

        let result = user::Entity::update_many()
            .col_expr(user::Column::Deposit, Expr::col(user::Column::Deposit).add(amount))
            .filter(user::Column::Id.eq(user.id))
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(CommerceError::UserNotFound(user.username.clone()));
        }

        let updated = self.find_user(user.id).await?;
        info!("User {} deposited {}, balance {}", updated.username, amount, updated.deposit);
        Ok(updated)
    }

    #[instrument(skip(self, user), fields(user_id = user.id))]
    pub async fn reset_deposit(&self, user: &user::Model) -> Result<user::Model> {
        let result = user::Entity::update_many()
            .col_expr(user::Column::Deposit, Expr::value(0i64))
            .filter(user::Column::Id.eq(user.id))
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(CommerceError::UserNotFound(user.username.clone()));
        }

        info!("Reset deposit of user {}", user.username);
        self.find_user(user.id).await
    }
}
