use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Username).unique_key())
                    .col(string(Users::PasswordHash))
                    .col(
                        big_integer(Users::Deposit)
                            .default(0)
                            .check(Expr::col(Users::Deposit).gte(0)),
                    )
                    .to_owned(),
            )
            .await?;

        // Create privileges table
        manager
            .create_table(
                Table::create()
                    .table(Privileges::Table)
                    .if_not_exists()
                    .col(pk_auto(Privileges::Id))
                    .col(string_len(Privileges::Name, 32).unique_key())
                    .to_owned(),
            )
            .await?;

        // Create roles table
        manager
            .create_table(
                Table::create()
                    .table(Roles::Table)
                    .if_not_exists()
                    .col(pk_auto(Roles::Id))
                    .col(string(Roles::Name).unique_key())
                    .to_owned(),
            )
            .await?;

        // Create roles_privileges table (join table)
        manager
            .create_table(
                Table::create()
                    .table(RolesPrivileges::Table)
                    .if_not_exists()
                    .col(integer(RolesPrivileges::RoleId))
                    .col(integer(RolesPrivileges::PrivilegeId))
                    .primary_key(
                        Index::create()
                            .name("pk_roles_privileges")
                            .col(RolesPrivileges::RoleId)
                            .col(RolesPrivileges::PrivilegeId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_roles_privileges_role")
                            .from(RolesPrivileges::Table, RolesPrivileges::RoleId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_roles_privileges_privilege")
                            .from(RolesPrivileges::Table, RolesPrivileges::PrivilegeId)
                            .to(Privileges::Table, Privileges::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create users_roles table (join table)
        manager
            .create_table(
                Table::create()
                    .table(UsersRoles::Table)
                    .if_not_exists()
                    .col(integer(UsersRoles::UserId))
                    .col(integer(UsersRoles::RoleId))
                    .primary_key(
                        Index::create()
                            .name("pk_users_roles")
                            .col(UsersRoles::UserId)
                            .col(UsersRoles::RoleId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_roles_user")
                            .from(UsersRoles::Table, UsersRoles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_roles_role")
                            .from(UsersRoles::Table, UsersRoles::RoleId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create products table
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(pk_auto(Products::Id))
                    .col(string(Products::Name))
                    .col(integer(Products::Cost))
                    .col(
                        integer(Products::AmountAvailable)
                            .default(0)
                            .check(Expr::col(Products::AmountAvailable).gte(0)),
                    )
                    .col(integer_null(Products::SellerId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_seller")
                            .from(Products::Table, Products::SellerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create tokens table
        manager
            .create_table(
                Table::create()
                    .table(Tokens::Table)
                    .if_not_exists()
                    .col(pk_auto(Tokens::Id))
                    .col(string(Tokens::Token).unique_key())
                    .col(integer(Tokens::UserId).unique_key())
                    .col(timestamp_with_time_zone(Tokens::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tokens_user")
                            .from(Tokens::Table, Tokens::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(Tokens::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(UsersRoles::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(RolesPrivileges::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Roles::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Privileges::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    Deposit,
}

#[derive(DeriveIden)]
enum Privileges {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Roles {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum RolesPrivileges {
    Table,
    RoleId,
    PrivilegeId,
}

#[derive(DeriveIden)]
enum UsersRoles {
    Table,
    UserId,
    RoleId,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    Name,
    Cost,
    AmountAvailable,
    SellerId,
}

#[derive(DeriveIden)]
enum Tokens {
    Table,
    Id,
    Token,
    UserId,
    CreatedAt,
}
