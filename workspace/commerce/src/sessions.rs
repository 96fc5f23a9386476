//! Password hashing and token sessions.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use model::entities::{token, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::{CommerceError, Result};

/// Hash a password into a PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CommerceError::PasswordHash(e.to_string()))
}

/// Check `password` against a stored PHC hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| CommerceError::PasswordHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn generate_token(username: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    hasher.update(Uuid::new_v4().as_bytes());
    hasher.update(Utc::now().to_rfc3339().as_bytes());
    STANDARD.encode(hasher.finalize())
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: i32,
    /// Token that was live for the user before this login, now revoked.
    pub replaced: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct SessionService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SessionService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Verify credentials and issue a new token, replacing the user's old one.
    ///
    /// Unknown users and wrong passwords fail the same way.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let Some(account) = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db)
            .await?
        else {
            warn!("Login attempt for unknown user {}", username);
            return Err(CommerceError::InvalidCredentials);
        };

        if !verify_password(password, &account.password_hash)? {
            warn!("Wrong password for user {}", username);
            return Err(CommerceError::InvalidCredentials);
        }

        let txn = self.db.begin().await?;

        let previous = token::Entity::find()
            .filter(token::Column::UserId.eq(account.id))
            .one(&txn)
            .await?;
        let replaced = previous.as_ref().map(|t| t.token.clone());
        if let Some(previous) = previous {
            token::Entity::delete_by_id(previous.id).exec(&txn).await?;
            debug!("Revoked previous token of user {}", username);
        }

        let issued = token::ActiveModel {
            token: Set(generate_token(username)),
            user_id: Set(account.id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!("User {} logged in", username);
        Ok(Session {
            token: issued.token,
            user_id: account.id,
            replaced,
        })
    }

    /// Id of the user owning `token`.
    pub async fn user_id_for(&self, token: &str) -> Result<i32> {
        token::Entity::find()
            .filter(token::Column::Token.eq(token))
            .one(self.db)
            .await?
            .map(|t| t.user_id)
            .ok_or(CommerceError::InvalidToken)
    }

    /// Resolve a token to its user.
    #[instrument(skip(self, token))]
    pub async fn user_from_token(&self, token: &str) -> Result<user::Model> {
        let user_id = self.user_id_for(token).await?;
        self.user_by_id(user_id).await
    }

    /// Fresh user row for an id obtained from a token.
    pub async fn user_by_id(&self, user_id: i32) -> Result<user::Model> {
        user::Entity::find_by_id(user_id)
            .one(self.db)
            .await?
            .ok_or(CommerceError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::BUYER_ROLE;
    use crate::testing::{new_user, setup_db};

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("s3cret").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("s3cret", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_same_password_gets_different_salts() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(matches!(
            verify_password("x", "not-a-phc-string"),
            Err(CommerceError::PasswordHash(_))
        ));
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = generate_token("alice");
        let b = generate_token("alice");
        assert_ne!(a, b);
        // sha256 digest, base64 encoded
        assert_eq!(a.len(), 44);
    }

    #[tokio::test]
    async fn test_login_and_resolve() {
        let db = setup_db().await;
        let alice = new_user(&db, "alice", 0, &[BUYER_ROLE]).await;
        let sessions = SessionService::new(&db);

        let session = sessions.login("alice", "password").await.unwrap();
        assert_eq!(session.user_id, alice.id);
        assert_eq!(session.replaced, None);

        let resolved = sessions.user_from_token(&session.token).await.unwrap();
        assert_eq!(resolved.id, alice.id);
    }

    #[tokio::test]
    async fn test_wrong_credentials() {
        let db = setup_db().await;
        new_user(&db, "alice", 0, &[]).await;
        let sessions = SessionService::new(&db);

        assert!(matches!(
            sessions.login("alice", "nope").await,
            Err(CommerceError::InvalidCredentials)
        ));
        assert!(matches!(
            sessions.login("mallory", "password").await,
            Err(CommerceError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_relogin_revokes_the_old_token() {
        let db = setup_db().await;
        new_user(&db, "alice", 0, &[]).await;
        let sessions = SessionService::new(&db);

        let first = sessions.login("alice", "password").await.unwrap();
        let second = sessions.login("alice", "password").await.unwrap();

        assert_eq!(second.replaced.as_deref(), Some(first.token.as_str()));
        assert!(matches!(
            sessions.user_from_token(&first.token).await,
            Err(CommerceError::InvalidToken)
        ));
        assert!(sessions.user_from_token(&second.token).await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let db = setup_db().await;
        assert!(matches!(
            SessionService::new(&db).user_from_token("bogus").await,
            Err(CommerceError::InvalidToken)
        ));
    }
}
