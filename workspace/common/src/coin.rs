use serde::{Deserialize, Serialize};
use std::fmt;

/// A coin accepted by the machine.
///
/// Product costs must be one of these values and change is paid out in them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Coin {
    Five,
    Ten,
    Twenty,
    Fifty,
    Hundred,
}

impl Coin {
    /// All coins, largest first. Greedy change making relies on this order.
    pub const DESCENDING: [Coin; 5] = [Coin::Hundred, Coin::Fifty, Coin::Twenty, Coin::Ten, Coin::Five];

    pub fn value(self) -> i64 {
        match self {
            Coin::Five => 5,
            Coin::Ten => 10,
            Coin::Twenty => 20,
            Coin::Fifty => 50,
            Coin::Hundred => 100,
        }
    }
}

impl TryFrom<i64> for Coin {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Coin::DESCENDING
            .into_iter()
            .find(|coin| coin.value() == value)
            .ok_or_else(|| format!("{} is not an accepted coin (5, 10, 20, 50, 100)", value))
    }
}

impl From<Coin> for i64 {
    fn from(coin: Coin) -> Self {
        coin.value()
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descending_order() {
        let values: Vec<i64> = Coin::DESCENDING.iter().map(|c| c.value()).collect();
        assert_eq!(values, vec![100, 50, 20, 10, 5]);
    }

    #[test]
    fn test_try_from_accepts_only_coins() {
        assert_eq!(Coin::try_from(20), Ok(Coin::Twenty));
        assert_eq!(Coin::try_from(100), Ok(Coin::Hundred));
        assert!(Coin::try_from(0).is_err());
        assert!(Coin::try_from(15).is_err());
        assert!(Coin::try_from(-5).is_err());
    }

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Coin::Fifty).unwrap(), "50");
        let coin: Coin = serde_json::from_str("10").unwrap();
        assert_eq!(coin, Coin::Ten);
        assert!(serde_json::from_str::<Coin>("7").is_err());
    }
}
