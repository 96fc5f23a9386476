//! Role based privilege checks.
//!
//! A user is allowed to perform an action when any of their roles grants
//! the required privilege. Nothing is cached: every check reloads the
//! user's roles so a freshly attached role takes effect immediately.

use std::collections::HashSet;

use model::entities::privilege::PrivilegeName;
use model::entities::{privilege, role, user, user_role};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::{debug, instrument, warn};

use crate::error::{AuthError, Result};

/// A role held by a user together with the privileges it grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGrant {
    pub role: String,
    pub privileges: Vec<PrivilegeName>,
}

/// Decide whether the grants allow `required`.
///
/// Privileges are unioned across all roles and compared by name.
pub fn authorize(username: &str, grants: &[RoleGrant], required: PrivilegeName) -> std::result::Result<(), AuthError> {
    if grants.is_empty() {
        return Err(AuthError::NoRoles {
            username: username.to_string(),
        });
    }

    let union: HashSet<PrivilegeName> = grants
        .iter()
        .flat_map(|grant| grant.privileges.iter().copied())
        .collect();

    if union.contains(&required) {
        Ok(())
    } else {
        Err(AuthError::PrivilegeDenied {
            username: username.to_string(),
            privilege: required,
        })
    }
}

/// Loads a user's roles and checks privileges against them.
#[derive(Debug, Clone, Copy)]
pub struct AuthorizationChecker<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AuthorizationChecker<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Roles of the user, each with its privileges.
    #[instrument(skip(self, user), fields(user_id = user.id))]
    pub async fn grants(&self, user: &user::Model) -> Result<Vec<RoleGrant>> {
        let role_ids: Vec<i32> = user_role::Entity::find()
            .filter(user_role::Column::UserId.eq(user.id))
            .all(self.db)
            .await?
            .into_iter()
            .map(|membership| membership.role_id)
            .collect();

        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        let grants: Vec<RoleGrant> = role::Entity::find()
            .filter(role::Column::Id.is_in(role_ids))
            .find_with_related(privilege::Entity)
            .all(self.db)
            .await?
            .into_iter()
            .map(|(role, privileges)| RoleGrant {
                role: role.name,
                privileges: privileges.into_iter().map(|p| p.name).collect(),
            })
            .collect();

        debug!("User {} holds {} role(s)", user.username, grants.len());
        Ok(grants)
    }

    /// Fails with [`AuthError::NoRoles`] or [`AuthError::PrivilegeDenied`].
    #[instrument(skip(self, user), fields(user_id = user.id))]
    pub async fn check(&self, user: &user::Model, required: PrivilegeName) -> Result<()> {
        let grants = self.grants(user).await?;

        authorize(&user.username, &grants, required).map_err(|err| {
            warn!("Denied {} to user {}: {}", required, user.username, err);
            err.into()
        })
    }
}
