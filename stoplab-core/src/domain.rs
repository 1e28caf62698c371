//! Domain types shared by the signal and exit modules.

use serde::{Deserialize, Serialize};

/// Trade direction of the positions being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Long,
    Short,
}

impl Direction {
    /// Map the `short` flag used by callers that describe direction as a bool.
    pub fn from_short(short: bool) -> Self {
        if short {
            Direction::Short
        } else {
            Direction::Long
        }
    }

    pub fn is_short(self) -> bool {
        self == Direction::Short
    }

    /// Fractional return of a position opened at `entry_price`, marked at `price`.
    ///
    /// Long: `(price - entry) / entry`. Short: `(entry - price) / entry`.
    /// The caller guarantees `entry_price` is finite and positive.
    pub fn signed_return(self, entry_price: f64, price: f64) -> f64 {
        match self {
            Direction::Long => (price - entry_price) / entry_price,
            Direction::Short => (entry_price - price) / entry_price,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Long => "long",
            Direction::Short => "short",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_short_flag() {
        assert_eq!(Direction::from_short(false), Direction::Long);
        assert_eq!(Direction::from_short(true), Direction::Short);
        assert!(Direction::Short.is_short());
    }

    #[test]
    fn long_return_sign() {
        assert!((Direction::Long.signed_return(100.0, 110.0) - 0.1).abs() < 1e-12);
        assert!(Direction::Long.signed_return(100.0, 95.0) < 0.0);
    }

    #[test]
    fn short_return_sign() {
        assert!((Direction::Short.signed_return(100.0, 90.0) - 0.1).abs() < 1e-12);
        assert!(Direction::Short.signed_return(100.0, 105.0) < 0.0);
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&Direction::Short).unwrap();
        assert_eq!(json, "\"short\"");
    }
}
