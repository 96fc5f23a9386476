//! Idempotent bootstrap data: privileges, the default roles and a sample
//! product. Safe to run on every start.

use model::entities::privilege::PrivilegeName;
use model::entities::{privilege, product, role, role_privilege};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, Iterable, QueryFilter, Set,
    TransactionTrait,
};
use tracing::{debug, info, instrument};

use crate::error::Result;

pub const SELLER_ROLE: &str = "SELLER";
pub const BUYER_ROLE: &str = "BUYER";

pub const SAMPLE_PRODUCT: &str = "product 1";

/// Privileges granted by each default role.
pub const DEFAULT_ROLES: [(&str, &[PrivilegeName]); 2] = [
    (
        SELLER_ROLE,
        &[
            PrivilegeName::ProductAdd,
            PrivilegeName::ProductRemove,
            PrivilegeName::ProductUpdate,
        ],
    ),
    (BUYER_ROLE, &[PrivilegeName::ProductBuy, PrivilegeName::UserDeposit]),
];

/// Counts of rows created by a [`bootstrap`] run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub privileges: usize,
    pub roles: usize,
    pub products: usize,
}

#[instrument(skip(db))]
pub async fn bootstrap(db: &DatabaseConnection) -> Result<SeedReport> {
    let txn = db.begin().await?;
    let mut report = SeedReport::default();

    for name in PrivilegeName::iter() {
        let (_, created) = ensure_privilege(&txn, name).await?;
        if created {
            report.privileges += 1;
        }
    }

    for (role_name, privileges) in DEFAULT_ROLES {
        let (role, created) = ensure_role(&txn, role_name).await?;
        if created {
            report.roles += 1;
        }
        for name in privileges {
            let (privilege, _) = ensure_privilege(&txn, *name).await?;
            grant(&txn, &role, &privilege).await?;
        }
    }

    let sample = product::Entity::find()
        .filter(product::Column::Name.eq(SAMPLE_PRODUCT))
        .one(&txn)
        .await?;
    if sample.is_none() {
        product::ActiveModel {
            name: Set(SAMPLE_PRODUCT.to_string()),
            cost: Set(5),
            amount_available: Set(1000),
            seller_id: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        report.products += 1;
    }

    txn.commit().await?;

    info!(
        "Seeded {} privilege(s), {} role(s), {} product(s)",
        report.privileges, report.roles, report.products
    );
    Ok(report)
}

async fn ensure_privilege(txn: &DatabaseTransaction, name: PrivilegeName) -> Result<(privilege::Model, bool)> {
    if let Some(existing) = privilege::Entity::find()
        .filter(privilege::Column::Name.eq(name))
        .one(txn)
        .await?
    {
        return Ok((existing, false));
    }

    debug!("Creating privilege {}", name);
    let created = privilege::ActiveModel {
        name: Set(name),
        ..Default::default()
    }
    .insert(txn)
    .await?;
    Ok((created, true))
}

async fn ensure_role(txn: &DatabaseTransaction, name: &str) -> Result<(role::Model, bool)> {
    if let Some(existing) = role::Entity::find()
        .filter(role::Column::Name.eq(name))
        .one(txn)
        .await?
    {
        return Ok((existing, false));
    }

    debug!("Creating role {}", name);
    let created = role::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(txn)
    .await?;
    Ok((created, true))
}

async fn grant(txn: &DatabaseTransaction, role: &role::Model, privilege: &privilege::Model) -> Result<()> {
    let existing = role_privilege::Entity::find_by_id((role.id, privilege.id))
        .one(txn)
        .await?;
    if existing.is_none() {
        role_privilege::ActiveModel {
            role_id: Set(role.id),
            privilege_id: Set(privilege.id),
        }
        .insert(txn)
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::setup_db;
    use sea_orm::{ModelTrait, PaginatorTrait};

    #[tokio::test]
    async fn test_bootstrap_is_idempotent() {
        // setup_db already seeded once
        let db = setup_db().await;

        let report = bootstrap(&db).await.unwrap();
        assert_eq!(report, SeedReport::default());

        assert_eq!(privilege::Entity::find().count(&db).await.unwrap(), 5);
        assert_eq!(role::Entity::find().count(&db).await.unwrap(), 2);
        assert_eq!(role_privilege::Entity::find().count(&db).await.unwrap(), 5);
        assert_eq!(
            product::Entity::find()
                .filter(product::Column::Name.eq(SAMPLE_PRODUCT))
                .count(&db)
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_default_roles_carry_their_privileges() {
        let db = setup_db().await;

        for (role_name, expected) in DEFAULT_ROLES {
            let role = role::Entity::find()
                .filter(role::Column::Name.eq(role_name))
                .one(&db)
                .await
                .unwrap()
                .unwrap();
            let mut names: Vec<PrivilegeName> = role
                .find_related(privilege::Entity)
                .all(&db)
                .await
                .unwrap()
                .into_iter()
                .map(|p| p.name)
                .collect();
            names.sort();

            let mut expected = expected.to_vec();
            expected.sort();
            assert_eq!(names, expected, "privileges of {}", role_name);
        }
    }
}
