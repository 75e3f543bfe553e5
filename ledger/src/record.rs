//! Per-holder accounting record.

use rebase_accrual::{accrue, displayed_balance, AccrualError};
use rebase_types::{Rate, Timestamp};
use serde::{Deserialize, Serialize};

/// What the ledger stores for one holder.
///
/// Created implicitly on first touch and never deleted; only `principal`
/// returns to zero. `assigned_rate` is meaningful only while principal is
/// non-zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderRecord {
    /// Base units owned, excluding unrealized interest.
    pub principal: u128,
    /// Rate snapshotted when the balance last became non-zero.
    pub assigned_rate: Rate,
    /// When interest was last folded into principal. Never moves backwards.
    pub last_accrual: Timestamp,
}

impl HolderRecord {
    /// Balance including interest accrued up to `now`.
    pub fn displayed_balance(&self, now: Timestamp) -> Result<u128, AccrualError> {
        displayed_balance(self.principal, self.assigned_rate, self.elapsed(now))
    }

    /// Copy of this record with pending interest folded into principal.
    ///
    /// Returns the new record and the interest realized. If `now` is behind
    /// `last_accrual` the timestamp is left where it is.
    pub fn realized(&self, now: Timestamp) -> Result<(Self, u128), AccrualError> {
        let accrued = accrue(self.principal, self.assigned_rate, self.elapsed(now))?;
        let record = Self {
            principal: accrued.balance,
            assigned_rate: self.assigned_rate,
            last_accrual: self.last_accrual.max(now),
        };
        Ok((record, accrued.interest))
    }

    pub fn is_empty(&self) -> bool {
        self.principal == 0
    }

    // An empty record earns nothing, however stale its timestamp.
    fn elapsed(&self, now: Timestamp) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.last_accrual.elapsed_since(now)
        }
    }
}
