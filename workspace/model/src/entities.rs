//! This file serves as the root for all SeaORM entity modules.
//! Users hold a deposit and a set of roles, roles bundle privileges,
//! sellers own products and every logged-in user carries one session token.

pub mod privilege;
pub mod product;
pub mod role;
pub mod role_privilege;
pub mod token;
pub mod user;
pub mod user_role;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::privilege::Entity as Privilege;
    pub use super::privilege::PrivilegeName;
    pub use super::product::Entity as Product;
    pub use super::role::Entity as Role;
    pub use super::role_privilege::Entity as RolePrivilege;
    pub use super::token::Entity as Token;
    pub use super::user::Entity as User;
    pub use super::user_role::Entity as UserRole;
}

#[cfg(test)]
mod test {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, ModelTrait, QueryFilter, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        let db = Database::connect("sqlite::memory:").await?;

        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    async fn new_privilege(db: &DatabaseConnection, name: PrivilegeName) -> Result<privilege::Model, DbErr> {
        privilege::ActiveModel {
            name: Set(name),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let seller = user::ActiveModel {
            username: Set("seller".to_string()),
            password_hash: Set("hash".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Deposit falls back to the column default
        assert_eq!(seller.deposit, 0);

        let add = new_privilege(&db, PrivilegeName::ProductAdd).await?;
        let remove = new_privilege(&db, PrivilegeName::ProductRemove).await?;

        let role = role::ActiveModel {
            name: Set("SELLER".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        for privilege_id in [add.id, remove.id] {
            role_privilege::ActiveModel {
                role_id: Set(role.id),
                privilege_id: Set(privilege_id),
            }
            .insert(&db)
            .await?;
        }

        user_role::ActiveModel {
            user_id: Set(seller.id),
            role_id: Set(role.id),
        }
        .insert(&db)
        .await?;

        let product = product::ActiveModel {
            name: Set("Cola".to_string()),
            cost: Set(50),
            amount_available: Set(10),
            seller_id: Set(Some(seller.id)),
            ..Default::default()
        }
        .insert(&db)
        .await?;
        assert!(product.is_sold_by(seller.id));
        assert!(!product.is_sold_by(seller.id + 1));

        // Roles of a user through the join table
        let roles = seller.find_related(Role).all(&db).await?;
        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].name, "SELLER");

        // Privileges of the role through the join table
        let mut names: Vec<PrivilegeName> = roles[0]
            .find_related(Privilege)
            .all(&db)
            .await?
            .into_iter()
            .map(|p| p.name)
            .collect();
        names.sort();
        assert_eq!(names, vec![PrivilegeName::ProductAdd, PrivilegeName::ProductRemove]);

        // Products of the seller
        let products = Product::find()
            .filter(product::Column::SellerId.eq(seller.id))
            .all(&db)
            .await?;
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Cola");

        // Privilege names are unique
        assert!(new_privilege(&db, PrivilegeName::ProductAdd).await.is_err());

        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_seller_keeps_product() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let seller = user::ActiveModel {
            username: Set("gone".to_string()),
            password_hash: Set("hash".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let product = product::ActiveModel {
            name: Set("Chips".to_string()),
            cost: Set(20),
            amount_available: Set(3),
            seller_id: Set(Some(seller.id)),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        User::delete_by_id(seller.id).exec(&db).await?;

        let orphan = Product::find_by_id(product.id).one(&db).await?.expect("product kept");
        assert_eq!(orphan.seller_id, None);
        assert_eq!(UserRole::find().all(&db).await?.len(), 0);
        assert_eq!(Token::find().all(&db).await?.len(), 0);
        assert_eq!(RolePrivilege::find().all(&db).await?.len(), 0);

        Ok(())
    }
}
