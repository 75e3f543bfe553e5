//! Amount requests.
//!
//! Balances are plain `u128` base units. Operations that can act on "the
//! holder's whole balance" take an [`AmountSpec`] instead of overloading a
//! magic maximum value, so a legitimately large literal is never mistaken for
//! the full-balance request.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How much of a balance an operation should move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmountSpec {
    /// Exactly this many base units.
    Exact(u128),
    /// The holder's full displayed balance at the moment the operation runs.
    Full,
}

impl AmountSpec {
    /// Resolve against the holder's current displayed balance.
    pub fn resolve(self, full_balance: u128) -> u128 {
        match self {
            Self::Exact(amount) => amount,
            Self::Full => full_balance,
        }
    }

    pub fn is_full(&self) -> bool {
        matches!(self, Self::Full)
    }
}

impl From<u128> for AmountSpec {
    fn from(amount: u128) -> Self {
        Self::Exact(amount)
    }
}

impl fmt::Display for AmountSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(amount) => write!(f, "{}", amount),
            Self::Full => write!(f, "full balance"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_ignores_balance() {
        assert_eq!(AmountSpec::Exact(7).resolve(100), 7);
    }

    #[test]
    fn full_takes_balance() {
        assert_eq!(AmountSpec::Full.resolve(100), 100);
        assert!(AmountSpec::Full.is_full());
    }

    #[test]
    fn large_literal_is_not_full() {
        let spec = AmountSpec::from(u128::MAX);
        assert!(!spec.is_full());
        assert_eq!(spec.resolve(5), u128::MAX);
    }
}
