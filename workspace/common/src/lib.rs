//! Transport types shared between the domain services and the HTTP layer.
//! Amounts are integers in the smallest currency unit.

mod coin;
mod receipt;

pub use coin::Coin;
pub use receipt::{Change, Receipt};
