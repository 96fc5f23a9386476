use crate::entity_iden::EntityIden;
use model::entities::prelude::*;
use model::entities::product;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Sellers list their own products on every catalog request
        manager
            .create_index(
                Index::create()
                    .name("idx_products_seller_id")
                    .table(Product::table())
                    .col(Product::column(product::Column::SellerId))
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_products_seller_id")
                    .table(Product::table())
                    .to_owned(),
            )
            .await
    }
}
