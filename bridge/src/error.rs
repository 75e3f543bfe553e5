use rebase_ledger::LedgerError;
use rebase_messages::{CodecError, TransportError};
use rebase_types::{Address, ChainSelector};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("{0} is not an allowed remote chain")]
    ChainNotAllowed(ChainSelector),

    #[error("rate limit exceeded: requested {requested}, available {available}")]
    RateLimitExceeded { requested: u128, available: u128 },

    #[error("invalid rate limiter config: {0}")]
    InvalidRateLimitConfig(String),

    #[error("unknown sender {sender} for {chain}")]
    UnknownSender { chain: ChainSelector, sender: Address },

    #[error("{0} is not the pool administrator")]
    NotAdministrator(Address),

    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("config error: {0}")]
    Config(String),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}
