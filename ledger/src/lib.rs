//! The rebasing token ledger.
//!
//! Stores one [`HolderRecord`] per holder: principal, the interest rate the
//! holder was assigned, and the time interest was last realized. Displayed
//! balances are derived from those three values by `rebase-accrual`; only
//! principal is persisted, and pending interest is folded into it
//! (realized) at the start of every mutating operation on that holder.
//!
//! Rate assignment rules:
//! - First mint into an empty balance snapshots the global rate.
//! - Transfer into an empty balance inherits the sender's rate.
//! - Bridge mint overrides the rate with the one carried in the message.
//!
//! The global rate can only decrease. Every operation runs under a single
//! write lock, so no two mutations on one ledger interleave.

pub mod access;
pub mod error;
pub mod event;
pub mod ledger;
pub mod record;

pub use access::{AccessControl, Capability};
pub use error::LedgerError;
pub use event::{EventBus, LedgerEvent, SequencedEvent};
pub use ledger::{BurnReceipt, Ledger};
pub use record::HolderRecord;
