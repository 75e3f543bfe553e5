//! Nullable escrow: in-memory base-asset custody.

use rebase_types::{Address, Escrow, EscrowError};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct EscrowState {
    reserves: u128,
    deposited: HashMap<Address, u128>,
    paid_out: HashMap<Address, u128>,
    reject_withdrawals: bool,
}

/// An escrow that keeps reserves in memory and can be told to refuse payouts.
#[derive(Default)]
pub struct NullEscrow {
    state: Mutex<EscrowState>,
}

impl NullEscrow {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, EscrowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every following withdrawal fail (or succeed again).
    pub fn set_reject_withdrawals(&self, reject: bool) {
        self.lock().reject_withdrawals = reject;
    }

    /// Total base asset `who` has put in.
    pub fn deposited_by(&self, who: &Address) -> u128 {
        self.lock().deposited.get(who).copied().unwrap_or(0)
    }

    /// Total base asset released to `who`.
    pub fn paid_to(&self, who: &Address) -> u128 {
        self.lock().paid_out.get(who).copied().unwrap_or(0)
    }
}

impl Escrow for NullEscrow {
    fn deposit(&self, from: &Address, amount: u128) -> Result<(), EscrowError> {
        let mut state = self.lock();
        state.reserves = state
            .reserves
            .checked_add(amount)
            .ok_or_else(|| EscrowError::Other("reserve overflow".into()))?;
        *state.deposited.entry(from.clone()).or_insert(0) += amount;
        Ok(())
    }

    fn withdraw(&self, to: &Address, amount: u128) -> Result<(), EscrowError> {
        let mut state = self.lock();
        if state.reject_withdrawals {
            return Err(EscrowError::TransferRejected(to.clone()));
        }
        if state.reserves < amount {
            return Err(EscrowError::InsufficientReserves {
                requested: amount,
                available: state.reserves,
            });
        }
        state.reserves -= amount;
        *state.paid_out.entry(to.clone()).or_insert(0) += amount;
        Ok(())
    }

    fn balance(&self) -> u128 {
        self.lock().reserves
    }
}
