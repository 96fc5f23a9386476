//! Products owned by sellers.

use common::Coin;
use model::entities::{product, user};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::{debug, info, instrument, warn};

use crate::error::{CommerceError, Result};

/// Input for [`CatalogService::create_product`].
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub amount_available: i32,
    pub cost: i32,
}

/// Partial update of a product. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub amount_available: Option<i32>,
    pub cost: Option<i32>,
}

fn validate_cost(cost: i32) -> Result<()> {
    Coin::try_from(i64::from(cost))
        .map(|_| ())
        .map_err(|_| CommerceError::InvalidCost(cost))
}

fn validate_stock(amount_available: i32) -> Result<()> {
    if amount_available < 0 {
        return Err(CommerceError::Validation(format!(
            "amount available cannot be negative, got {}",
            amount_available
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
pub struct CatalogService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CatalogService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn products_by_seller(&self, seller: &user::Model) -> Result<Vec<product::Model>> {
        Ok(product::Entity::find()
            .filter(product::Column::SellerId.eq(seller.id))
            .order_by_asc(product::Column::Id)
            .all(self.db)
            .await?)
    }

    #[instrument(skip(self, seller, new), fields(seller_id = seller.id, name = %new.name))]
    pub async fn create_product(&self, seller: &user::Model, new: NewProduct) -> Result<product::Model> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(CommerceError::Validation("product name is required".to_string()));
        }
        validate_cost(new.cost)?;
        validate_stock(new.amount_available)?;

        let created = product::ActiveModel {
            name: Set(name.to_string()),
            cost: Set(new.cost),
            amount_available: Set(new.amount_available),
            seller_id: Set(Some(seller.id)),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        info!("User {} added product {} ({})", seller.username, created.name, created.id);
        Ok(created)
    }

    /// Fetch a product the seller owns.
    async fn owned_product(&self, seller: &user::Model, product_id: i32) -> Result<product::Model> {
        let product = product::Entity::find_by_id(product_id)
            .one(self.db)
            .await?
            .ok_or(CommerceError::ProductNotFound(product_id))?;

        if !product.is_sold_by(seller.id) {
            warn!("User {} does not own product {}", seller.username, product_id);
            return Err(CommerceError::NotProductOwner(product_id));
        }
        Ok(product)
    }

    /// Apply the provided, non-empty fields that differ from the stored values.
    #[instrument(skip(self, seller, patch), fields(seller_id = seller.id))]
    pub async fn update_product(
        &self,
        seller: &user::Model,
        product_id: i32,
        patch: ProductPatch,
    ) -> Result<product::Model> {
        let product = self.owned_product(seller, product_id).await?;
        let mut active: product::ActiveModel = product.clone().into();
        let mut changed = false;

        if let Some(name) = patch.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            if name != product.name {
                active.name = Set(name.to_string());
                changed = true;
            }
        }
        if let Some(cost) = patch.cost {
            validate_cost(cost)?;
            if cost != product.cost {
                active.cost = Set(cost);
                changed = true;
            }
        }
        if let Some(amount) = patch.amount_available {
            validate_stock(amount)?;
            if amount != product.amount_available {
                active.amount_available = Set(amount);
                changed = true;
            }
        }

        if !changed {
            debug!("Nothing to update on product {}", product_id);
            return Ok(product);
        }

        let updated = active.update(self.db).await?;
        info!("User {} updated product {}", seller.username, product_id);
        Ok(updated)
    }

    /// Delete a product and return what was removed.
    #[instrument(skip(self, seller), fields(seller_id = seller.id))]
    pub async fn delete_product(&self, seller: &user::Model, product_id: i32) -> Result<product::Model> {
        let product = self.owned_product(seller, product_id).await?;
        product::Entity::delete_by_id(product.id).exec(self.db).await?;

        info!("User {} removed product {}", seller.username, product_id);
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::SELLER_ROLE;
    use crate::testing::{new_user, setup_db};

    fn soda(cost: i32, amount_available: i32) -> NewProduct {
        NewProduct {
            name: "Soda".to_string(),
            amount_available,
            cost,
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let db = setup_db().await;
        let catalog = CatalogService::new(&db);
        let seller = new_user(&db, "seller", 0, &[SELLER_ROLE]).await;
        let other = new_user(&db, "other", 0, &[SELLER_ROLE]).await;

        let created = catalog.create_product(&seller, soda(20, 10)).await.unwrap();
        assert_eq!(created.seller_id, Some(seller.id));
        catalog.create_product(&other, soda(50, 1)).await.unwrap();

        let mine = catalog.products_by_seller(&seller).await.unwrap();
        assert_eq!(mine, vec![created]);
    }

    #[tokio::test]
    async fn test_create_validates_cost_stock_and_name() {
        let db = setup_db().await;
        let catalog = CatalogService::new(&db);
        let seller = new_user(&db, "seller", 0, &[SELLER_ROLE]).await;

        for cost in [0, 1, 3, 15, 25, 200, -5] {
            assert!(matches!(
                catalog.create_product(&seller, soda(cost, 1)).await,
                Err(CommerceError::InvalidCost(c)) if c == cost
            ));
        }
        assert!(matches!(
            catalog.create_product(&seller, soda(5, -1)).await,
            Err(CommerceError::Validation(_))
        ));
        assert!(matches!(
            catalog
                .create_product(
                    &seller,
                    NewProduct {
                        name: " ".to_string(),
                        amount_available: 1,
                        cost: 5
                    }
                )
                .await,
            Err(CommerceError::Validation(_))
        ));
        assert!(catalog.products_by_seller(&seller).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_applies_only_changed_fields() {
        let db = setup_db().await;
        let catalog = CatalogService::new(&db);
        let seller = new_user(&db, "seller", 0, &[SELLER_ROLE]).await;
        let product = catalog.create_product(&seller, soda(20, 10)).await.unwrap();

        let updated = catalog
            .update_product(
                &seller,
                product.id,
                ProductPatch {
                    name: Some(String::new()),
                    cost: Some(50),
                    amount_available: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Soda");
        assert_eq!(updated.cost, 50);
        assert_eq!(updated.amount_available, 10);

        assert!(matches!(
            catalog
                .update_product(
                    &seller,
                    product.id,
                    ProductPatch {
                        cost: Some(7),
                        ..Default::default()
                    }
                )
                .await,
            Err(CommerceError::InvalidCost(7))
        ));
    }

    #[tokio::test]
    async fn test_only_the_seller_can_modify() {
        let db = setup_db().await;
        let catalog = CatalogService::new(&db);
        let seller = new_user(&db, "seller", 0, &[SELLER_ROLE]).await;
        let intruder = new_user(&db, "intruder", 0, &[SELLER_ROLE]).await;
        let product = catalog.create_product(&seller, soda(20, 10)).await.unwrap();

        assert!(matches!(
            catalog
                .update_product(&intruder, product.id, ProductPatch::default())
                .await,
            Err(CommerceError::NotProductOwner(_))
        ));
        assert!(matches!(
            catalog.delete_product(&intruder, product.id).await,
            Err(CommerceError::NotProductOwner(_))
        ));
        assert!(matches!(
            catalog.delete_product(&seller, 9_999).await,
            Err(CommerceError::ProductNotFound(9_999))
        ));

        let deleted = catalog.delete_product(&seller, product.id).await.unwrap();
        assert_eq!(deleted.id, product.id);
        assert!(product::Entity::find_by_id(product.id)
            .one(&db)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_seeded_product_has_no_owner() {
        let db = setup_db().await;
        let catalog = CatalogService::new(&db);
        let seller = new_user(&db, "seller", 0, &[SELLER_ROLE]).await;

        let seeded = product::Entity::find().one(&db).await.unwrap().unwrap();
        assert_eq!(seeded.seller_id, None);
        assert!(matches!(
            catalog.delete_product(&seller, seeded.id).await,
            Err(CommerceError::NotProductOwner(_))
        ));
    }
}
