//! Fundamental types for the rebase token protocol.
//!
//! This crate defines the value types shared across every other crate in the
//! workspace: holder addresses, chain selectors, amounts, timestamps, rate
//! constants and ledger parameters. It also declares the two external
//! collaborator seams the core consumes, [`Clock`] and [`Escrow`].

pub mod address;
pub mod amount;
pub mod chain;
pub mod clock;
pub mod escrow;
pub mod params;
pub mod rate;
pub mod time;

pub use address::Address;
pub use amount::AmountSpec;
pub use chain::ChainSelector;
pub use clock::{Clock, SystemClock};
pub use escrow::{Escrow, EscrowError};
pub use params::LedgerParams;
pub use rate::{Rate, DEFAULT_INITIAL_RATE, PRECISION_FACTOR};
pub use time::Timestamp;
