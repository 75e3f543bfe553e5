//! Nullable infrastructure for deterministic testing.
//!
//! Every external collaborator of the accounting core (clock, base-asset
//! escrow, cross-chain transport) is abstracted behind a trait. This crate
//! provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically (advance time, fail payouts, hold messages)
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod escrow;
pub mod transport;

pub use clock::NullClock;
pub use escrow::NullEscrow;
pub use transport::NullTransport;
