//! Domain services of the vending machine: who may do what, and what
//! happens to balances and stock when they do it.

pub mod accounts;
pub mod authorization;
pub mod catalog;
pub mod change;
pub mod error;
pub mod purchase;
pub mod seed;
pub mod sessions;

#[cfg(test)]
mod testing;

pub use accounts::{AccountService, NewAccount};
pub use authorization::{AuthorizationChecker, RoleGrant, authorize};
pub use catalog::{CatalogService, NewProduct, ProductPatch};
pub use change::make_change;
pub use error::{AuthError, CommerceError, PurchaseError, Result};
pub use purchase::PurchaseTransaction;
pub use sessions::{Session, SessionService, hash_password, verify_password};
