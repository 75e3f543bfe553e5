//! Ledger parameters.

use crate::rate::{Rate, DEFAULT_INITIAL_RATE, PRECISION_FACTOR};
use serde::{Deserialize, Serialize};

/// Parameters a ledger is deployed with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerParams {
    /// Global interest rate at deployment. Can only decrease afterwards.
    #[serde(default = "default_initial_rate")]
    pub initial_rate: Rate,

    /// Largest per-holder rate the ledger accepts, including rates carried
    /// in by bridge messages. Bounds the accrual multiplication.
    #[serde(default = "default_max_rate")]
    pub max_rate: Rate,
}

fn default_initial_rate() -> Rate {
    DEFAULT_INITIAL_RATE
}

// 100% growth per second is far beyond any sane configuration.
fn default_max_rate() -> Rate {
    PRECISION_FACTOR
}

impl LedgerParams {
    pub fn with_initial_rate(initial_rate: Rate) -> Self {
        Self {
            initial_rate,
            ..Self::default()
        }
    }
}

impl Default for LedgerParams {
    fn default() -> Self {
        Self {
            initial_rate: default_initial_rate(),
            max_rate: default_max_rate(),
        }
    }
}
