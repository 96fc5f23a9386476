use super::{role, token};
use sea_orm::entity::prelude::*;

/// Represents a user of the vending machine.
/// A user is either a buyer, a seller or both, depending on the roles attached.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    /// PHC formatted password hash. Never leaves the service layer.
    pub password_hash: String,
    /// Cash balance in the smallest currency unit. Never negative.
    pub deposit: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A seller can offer multiple products.
    #[sea_orm(has_many = "super::product::Entity")]
    Product,
    /// Relation for the many-to-many relationship with roles.
    #[sea_orm(has_many = "super::user_role::Entity")]
    UserRole,
    #[sea_orm(has_one = "super::token::Entity")]
    Token,
}

impl Related<role::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_role::Relation::Role.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::user_role::Relation::User.def().rev())
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Token.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
