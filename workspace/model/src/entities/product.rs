use super::user;
use sea_orm::entity::prelude::*;

/// A product offered by a seller.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Price of a single item. Always one of the accepted coin values.
    pub cost: i32,
    /// Items in stock. Never negative.
    pub amount_available: i32,
    /// The seller who created the product. Seeded products have no seller.
    pub seller_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SellerId",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    Seller,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seller.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether `user_id` is the seller of this product.
    pub fn is_sold_by(&self, user_id: i32) -> bool {
        self.seller_id == Some(user_id)
    }
}
