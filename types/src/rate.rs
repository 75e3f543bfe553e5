//! Fixed-point interest rate constants.
//!
//! Rates are per-second growth expressed in units of `1 / PRECISION_FACTOR`.
//! A rate of `5 * 10^10` grows a balance by `5e-8` of its principal per second.

/// Per-second interest rate scaled by [`PRECISION_FACTOR`].
pub type Rate = u128;

/// Scale used for all fixed-point interest math (1e18).
pub const PRECISION_FACTOR: u128 = 1_000_000_000_000_000_000;

/// Global rate a freshly deployed ledger starts with.
pub const DEFAULT_INITIAL_RATE: Rate = 50_000_000_000;
