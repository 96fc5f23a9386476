use super::role;
use sea_orm::entity::prelude::*;
use std::fmt;
use std::str::FromStr;

/// The closed set of capabilities a role can grant.
///
/// Privileges are compared by this value, never by row identity, so two
/// privilege rows carrying the same name grant the same capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum PrivilegeName {
    #[sea_orm(string_value = "PRODUCT_ADD")]
    ProductAdd,
    #[sea_orm(string_value = "PRODUCT_REMOVE")]
    ProductRemove,
    #[sea_orm(string_value = "PRODUCT_UPDATE")]
    ProductUpdate,
    #[sea_orm(string_value = "PRODUCT_BUY")]
    ProductBuy,
    #[sea_orm(string_value = "USER_DEPOSIT")]
    UserDeposit,
}

impl fmt::Display for PrivilegeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_value())
    }
}

impl FromStr for PrivilegeName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrivilegeName::try_from_value(&s.to_string()).map_err(|_| format!("Unknown privilege: {}", s))
    }
}

/// A single privilege row. The name is unique.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "privileges")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: PrivilegeName,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::role_privilege::Entity")]
    RolePrivilege,
}

impl Related<role::Entity> for Entity {
    fn to() -> RelationDef {
        super::role_privilege::Relation::Role.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::role_privilege::Relation::Privilege.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn test_privilege_name_round_trips_through_str() {
        for privilege in PrivilegeName::iter() {
            let name = privilege.to_string();
            assert_eq!(name, privilege.to_value());
            assert_eq!(name.parse::<PrivilegeName>(), Ok(privilege));
        }
        assert_eq!(PrivilegeName::ProductBuy.to_string(), "PRODUCT_BUY");
        assert_eq!("USER_DEPOSIT".parse(), Ok(PrivilegeName::UserDeposit));
    }

    #[test]
    fn test_unknown_privilege_is_rejected() {
        assert!("PRODUCT_STEAL".parse::<PrivilegeName>().is_err());
        assert!("product_buy".parse::<PrivilegeName>().is_err());
    }
}
