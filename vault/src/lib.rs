//! Vault: the entry and exit point between the base asset and the ledger.
//!
//! Depositing escrows base asset and mints the same number of base units;
//! redeeming burns and releases base asset. A redemption whose payout fails
//! leaves the ledger exactly as it was.

pub mod error;
pub mod vault;

pub use error::VaultError;
pub use vault::Vault;
