//! Interest accrual: the pure half of the rebase token.
//!
//! A holder's displayed balance is a deterministic function of three stored
//! values and the current time:
//! `balance = principal × (P + rate × (now − last_accrual)) / P`
//! where `P` is [`PRECISION_FACTOR`](rebase_types::PRECISION_FACTOR).
//!
//! Growth is linear, not compounding: compounding happens only when the
//! ledger realizes interest into principal on a mutating operation.
//!
//! This crate holds no state. It handles:
//! - The accrual multiplier for a rate over an elapsed window
//! - Displayed balance and pending (unrealized) interest
//! - Overflow detection: every product is checked and reported as an error

pub mod engine;
pub mod error;

pub use engine::{accrue, accrued_factor, displayed_balance, pending_interest, Accrued};
pub use error::AccrualError;
