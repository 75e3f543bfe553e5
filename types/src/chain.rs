//! Chain selector.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one independent ledger (chain) in a bridged deployment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChainSelector(u64);

impl ChainSelector {
    pub const fn new(selector: u64) -> Self {
        Self(selector)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn to_le_bytes(&self) -> [u8; 8] {
        self.0.to_le_bytes()
    }
}

impl fmt::Display for ChainSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chain:{}", self.0)
    }
}

impl From<u64> for ChainSelector {
    fn from(selector: u64) -> Self {
        Self(selector)
    }
}
