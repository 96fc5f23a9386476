use crate::coin::Coin;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Coins paid back to the buyer, keyed by coin value.
///
/// Every accepted coin is always present, with a zero count when unused,
/// so clients can rely on the five keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Change(BTreeMap<i64, u64>);

impl Change {
    /// Build change from per-coin counts. Coins not listed get a zero count.
    pub fn from_counts(counts: impl IntoIterator<Item = (Coin, u64)>) -> Self {
        let mut map: BTreeMap<i64, u64> = Coin::DESCENDING.iter().map(|c| (c.value(), 0)).collect();
        for (coin, count) in counts {
            *map.entry(coin.value()).or_insert(0) += count;
        }
        Self(map)
    }

    pub fn count(&self, coin: Coin) -> u64 {
        self.0.get(&coin.value()).copied().unwrap_or(0)
    }

    /// Total value of the change.
    pub fn total(&self) -> i64 {
        self.0
            .iter()
            .map(|(value, count)| value * i64::try_from(*count).unwrap_or(i64::MAX))
            .sum()
    }
}

/// Result of a purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Receipt {
    /// quantity * cost
    pub total_spent: i64,
    /// Buyer deposit after the debit
    pub remaining_balance: i64,
    /// Remaining balance broken into coins
    #[schema(value_type = Object)]
    pub change: Change,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_always_lists_every_coin() {
        let change = Change::from_counts([(Coin::Five, 1)]);
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json, serde_json::json!({"5": 1, "10": 0, "20": 0, "50": 0, "100": 0}));
        assert_eq!(change.total(), 5);
    }

    #[test]
    fn test_receipt_wire_format() {
        let receipt = Receipt {
            total_spent: 60,
            remaining_balance: 5,
            change: Change::from_counts([(Coin::Five, 1)]),
        };

        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["total_spent"], 60);
        assert_eq!(json["remaining_balance"], 5);
        assert_eq!(json["change"]["5"], 1);
        assert_eq!(json["change"]["100"], 0);

        let parsed: Receipt = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, receipt);
    }
}
