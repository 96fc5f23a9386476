use super::{privilege, user};
use sea_orm::entity::prelude::*;

/// A named bundle of privileges, e.g. `SELLER` or `BUYER`.
/// Roles are created by the seed routine and attached to users afterwards.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::role_privilege::Entity")]
    RolePrivilege,
    #[sea_orm(has_many = "super::user_role::Entity")]
    UserRole,
}

impl Related<privilege::Entity> for Entity {
    fn to() -> RelationDef {
        super::role_privilege::Relation::Privilege.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::role_privilege::Relation::Role.def().rev())
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_role::Relation::User.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::user_role::Relation::Role.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
