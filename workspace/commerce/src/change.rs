use common::{Change, Coin};

/// Break `balance` into coins, largest first.
///
/// Any remainder that is not a multiple of the smallest coin is dropped,
/// as is a negative balance.
pub fn make_change(balance: i64) -> Change {
    let mut remaining = balance.max(0);

    let counts: Vec<(Coin, u64)> = Coin::DESCENDING
        .into_iter()
        .map(|coin| {
            let count = remaining / coin.value();
            remaining %= coin.value();
            (coin, u64::try_from(count).unwrap_or(0))
        })
        .collect();

    Change::from_counts(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_five() {
        let change = make_change(5);
        assert_eq!(change.count(Coin::Five), 1);
        assert_eq!(change.count(Coin::Ten), 0);
        assert_eq!(change.count(Coin::Twenty), 0);
        assert_eq!(change.count(Coin::Fifty), 0);
        assert_eq!(change.count(Coin::Hundred), 0);
    }

    #[test]
    fn test_greedy_decomposition() {
        let change = make_change(385);
        assert_eq!(change.count(Coin::Hundred), 3);
        assert_eq!(change.count(Coin::Fifty), 1);
        assert_eq!(change.count(Coin::Twenty), 1);
        assert_eq!(change.count(Coin::Ten), 1);
        assert_eq!(change.count(Coin::Five), 1);
    }

    #[test]
    fn test_zero_balance_is_all_zero() {
        let change = make_change(0);
        assert_eq!(change.total(), 0);
        for coin in Coin::DESCENDING {
            assert_eq!(change.count(coin), 0);
        }
    }

    #[test]
    fn test_every_multiple_of_five_is_paid_back_exactly() {
        for balance in (0..=2_000).step_by(5) {
            assert_eq!(make_change(balance).total(), balance, "balance {}", balance);
        }
    }

    #[test]
    fn test_remainder_below_smallest_coin_is_dropped() {
        let change = make_change(23);
        assert_eq!(change.count(Coin::Twenty), 1);
        assert_eq!(change.total(), 20);
    }

    #[test]
    fn test_negative_balance_pays_nothing() {
        assert_eq!(make_change(-50).total(), 0);
    }
}
