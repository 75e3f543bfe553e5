use rebase_accrual::AccrualError;
use rebase_types::{Address, Rate};
use thiserror::Error;

use crate::access::Capability;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("global rate can only decrease: current {current}, requested {requested}")]
    RateIncreaseRejected { current: Rate, requested: Rate },

    #[error("{caller} lacks the {capability} capability")]
    Unauthorized { caller: Address, capability: Capability },

    #[error("{0} is not the ledger administrator")]
    NotAdministrator(Address),

    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("insufficient allowance: need {needed}, have {available}")]
    InsufficientAllowance { needed: u128, available: u128 },

    #[error("rate {rate} exceeds the ledger maximum {max}")]
    RateOutOfRange { rate: Rate, max: Rate },

    #[error("arithmetic overflow in ledger accounting")]
    Overflow,

    #[error("accrual error: {0}")]
    Accrual(#[from] AccrualError),
}
