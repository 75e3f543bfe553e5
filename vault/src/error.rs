use rebase_ledger::LedgerError;
use rebase_types::EscrowError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VaultError {
    #[error("amount must be non-zero")]
    ZeroAmount,

    /// The escrow refused to release base asset; nothing was burned.
    #[error("payout failed: {0}")]
    PayoutFailed(EscrowError),

    /// The escrow refused to take base asset in; nothing was minted.
    #[error("escrow error: {0}")]
    Escrow(EscrowError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
