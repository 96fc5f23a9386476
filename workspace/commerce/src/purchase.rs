//! The purchase flow: debit the buyer, take the items out of stock and
//! pay the remaining deposit back as change.
//!
//! Both mutations run inside one database transaction. Each is a single
//! conditional `UPDATE` so concurrent purchases touching the same buyer or
//! product are serialized by the row write and can never drive a balance or
//! a stock level below zero.

use common::Receipt;
use model::entities::{product, user};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, QueryFilter,
    TransactionTrait,
};
use tracing::{debug, error, info, instrument, warn};

use crate::change::make_change;
use crate::error::{PurchaseError, Result};

#[derive(Debug, Clone, Copy)]
pub struct PurchaseTransaction<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PurchaseTransaction<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Buy `quantity` items of `product_id` for `buyer_id`.
    ///
    /// Either everything is committed or nothing is: a stock failure rolls
    /// back the debit made just before it.
    #[instrument(skip(self))]
    pub async fn purchase(&self, buyer_id: i32, product_id: i32, quantity: i32) -> Result<Receipt> {
        if quantity <= 0 {
            warn!("Rejecting purchase of {} items", quantity);
            return Err(PurchaseError::InvalidQuantity(quantity).into());
        }

        let txn = self.db.begin().await?;

        match Self::apply(&txn, buyer_id, product_id, quantity).await {
            Ok(receipt) => {
                txn.commit().await?;
                info!(
                    "User {} bought {} x product {} for {}, remaining balance {}",
                    buyer_id, quantity, product_id, receipt.total_spent, receipt.remaining_balance
                );
                Ok(receipt)
            }
            Err(err) => {
                // Dropping the transaction rolls it back even if this fails
                if let Err(rollback_err) = txn.rollback().await {
                    error!("Rollback of purchase by user {} failed: {}", buyer_id, rollback_err);
                }
                warn!("Purchase by user {} of product {} failed: {}", buyer_id, product_id, err);
                Err(err)
            }
        }
    }

    async fn apply(txn: &DatabaseTransaction, buyer_id: i32, product_id: i32, quantity: i32) -> Result<Receipt> {
        let product = product::Entity::find_by_id(product_id)
            .one(txn)
            .await?
            .ok_or(PurchaseError::ProductNotFound(product_id))?;

        let total_cost = i64::from(quantity) * i64::from(product.cost);
        debug!("Total cost for {} x {}: {}", quantity, product.name, total_cost);

        debit_buyer(txn, buyer_id, total_cost).await?;
        take_from_stock(txn, product_id, quantity).await?;

        // Read back the balance the debit left behind
        let remaining_balance = user::Entity::find_by_id(buyer_id)
            .one(txn)
            .await?
            .ok_or(PurchaseError::BuyerNotFound(buyer_id))?
            .deposit;

        Ok(Receipt {
            total_spent: total_cost,
            remaining_balance,
            change: make_change(remaining_balance),
        })
    }
}

async fn debit_buyer(txn: &DatabaseTransaction, buyer_id: i32, amount: i64) -> Result<()> {
    let result = user::Entity::update_many()
        .col_expr(user::Column::Deposit, Expr::col(user::Column::Deposit).sub(amount))
        .filter(user::Column::Id.eq(buyer_id))
        .filter(user::Column::Deposit.gte(amount))
        .exec(txn)
        .await?;

    if result.rows_affected == 0 {
        let buyer = user::Entity::find_by_id(buyer_id)
            .one(txn)
            .await?
            .ok_or(PurchaseError::BuyerNotFound(buyer_id))?;

        return Err(PurchaseError::InsufficientBalance {
            required: amount,
            available: buyer.deposit,
        }
        .into());
    }

    Ok(())
}

async fn take_from_stock(txn: &DatabaseTransaction, product_id: i32, quantity: i32) -> Result<()> {
    let result = product::Entity::update_many()
        .col_expr(
            product::Column::AmountAvailable,
            Expr::col(product::Column::AmountAvailable).sub(quantity),
        )
        .filter(product::Column::Id.eq(product_id))
        .filter(product::Column::AmountAvailable.gte(quantity))
        .exec(txn)
        .await?;

    if result.rows_affected == 0 {
        let available = product::Entity::find_by_id(product_id)
            .one(txn)
            .await?
            .map(|p| p.amount_available)
            .ok_or(PurchaseError::ProductNotFound(product_id))?;

        return Err(PurchaseError::InsufficientStock {
            requested: quantity,
            available,
        }
        .into());
    }

    Ok(())
}
