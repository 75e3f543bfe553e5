//! Base-asset escrow interface consumed by the vault.

use crate::address::Address;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EscrowError {
    #[error("escrow holds {available}, cannot release {requested}")]
    InsufficientReserves { requested: u128, available: u128 },

    #[error("escrow rejected transfer to {0}")]
    TransferRejected(Address),

    #[error("{0}")]
    Other(String),
}

/// Custody of the underlying base asset.
///
/// Each call is atomic: it either moves the full amount or fails without
/// side effects.
pub trait Escrow: Send + Sync {
    /// Take `amount` of base asset from `from` into custody.
    fn deposit(&self, from: &Address, amount: u128) -> Result<(), EscrowError>;

    /// Release `amount` of base asset from custody to `to`.
    fn withdraw(&self, to: &Address, amount: u128) -> Result<(), EscrowError>;

    /// Base asset currently held.
    fn balance(&self) -> u128;
}
