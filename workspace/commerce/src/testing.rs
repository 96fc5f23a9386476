//! Fixtures shared by the unit tests of this crate.

use std::sync::OnceLock;

use migration::{Migrator, MigratorTrait};
use model::entities::{product, role, user, user_role};
use sea_orm::{ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tempfile::TempDir;

use crate::seed;
use crate::sessions::hash_password;

/// Password of every user created by [`new_user`].
pub const PASSWORD: &str = "password";

fn password_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(PASSWORD).expect("hash test password"))
}

async fn prepare(database_url: &str) -> DatabaseConnection {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("commerce=debug")
        .with_test_writer()
        .try_init();

    let db = Database::connect(database_url)
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None).await.expect("Failed to run migrations");
    seed::bootstrap(&db).await.expect("Failed to seed database");
    db
}

/// Fresh in-memory database, migrated and seeded.
///
/// It runs on a single connection, so queries never overlap.
pub async fn setup_db() -> DatabaseConnection {
    prepare("sqlite::memory:").await
}

/// Migrated and seeded database file backed by a connection pool, for tests
/// that need requests to really run side by side. Keep the directory alive
/// for as long as the connection is used.
pub async fn setup_file_db() -> (TempDir, DatabaseConnection) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("vending.db").display());
    let db = prepare(&url).await;
    (dir, db)
}

pub async fn role_id(db: &DatabaseConnection, name: &str) -> i32 {
    role::Entity::find()
        .filter(role::Column::Name.eq(name))
        .one(db)
        .await
        .unwrap()
        .unwrap_or_else(|| panic!("role {} is seeded", name))
        .id
}

pub async fn new_user(db: &DatabaseConnection, username: &str, deposit: i64, roles: &[&str]) -> user::Model {
    let user = user::ActiveModel {
        username: Set(username.to_string()),
        password_hash: Set(password_hash().to_string()),
        deposit: Set(deposit),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    for name in roles {
        user_role::ActiveModel {
            user_id: Set(user.id),
            role_id: Set(role_id(db, name).await),
        }
        .insert(db)
        .await
        .unwrap();
    }

    user
}

pub async fn new_product(
    db: &DatabaseConnection,
    name: &str,
    cost: i32,
    amount_available: i32,
    seller_id: Option<i32>,
) -> product::Model {
    product::ActiveModel {
        name: Set(name.to_string()),
        cost: Set(cost),
        amount_available: Set(amount_available),
        seller_id: Set(seller_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn deposit_of(db: &DatabaseConnection, user_id: i32) -> i64 {
    user::Entity::find_by_id(user_id).one(db).await.unwrap().unwrap().deposit
}

pub async fn stock_of(db: &DatabaseConnection, product_id: i32) -> i32 {
    product::Entity::find_by_id(product_id)
        .one(db)
        .await
        .unwrap()
        .unwrap()
        .amount_available
}
