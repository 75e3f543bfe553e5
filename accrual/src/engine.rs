//! Core accrual functions.

use crate::error::AccrualError;
use rebase_types::{Rate, PRECISION_FACTOR};
use serde::{Deserialize, Serialize};

/// Result of applying accrual to a principal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accrued {
    /// Stored principal the computation started from.
    pub principal: u128,
    /// Interest earned over the window, rounded down.
    pub interest: u128,
    /// `principal + interest`.
    pub balance: u128,
}

/// Fixed-point growth multiplier: `P + rate × elapsed`.
///
/// Equals `PRECISION_FACTOR` when either input is zero. Any window length
/// is accepted; only a product that leaves `u128` is an error.
pub fn accrued_factor(rate: Rate, elapsed_secs: u64) -> Result<u128, AccrualError> {
    let growth = rate
        .checked_mul(elapsed_secs as u128)
        .ok_or(AccrualError::Overflow)?;
    PRECISION_FACTOR
        .checked_add(growth)
        .ok_or(AccrualError::Overflow)
}

/// Displayed balance: `principal × factor / P`, rounded down.
pub fn displayed_balance(
    principal: u128,
    rate: Rate,
    elapsed_secs: u64,
) -> Result<u128, AccrualError> {
    let factor = accrued_factor(rate, elapsed_secs)?;
    mul_div_precision(principal, factor)
}

/// Interest earned but not yet folded into principal.
pub fn pending_interest(
    principal: u128,
    rate: Rate,
    elapsed_secs: u64,
) -> Result<u128, AccrualError> {
    let balance = displayed_balance(principal, rate, elapsed_secs)?;
    // factor >= P, so balance >= principal
    Ok(balance - principal)
}

/// Apply accrual and return principal, interest and balance together.
pub fn accrue(principal: u128, rate: Rate, elapsed_secs: u64) -> Result<Accrued, AccrualError> {
    let balance = displayed_balance(principal, rate, elapsed_secs)?;
    Ok(Accrued {
        principal,
        interest: balance - principal,
        balance,
    })
}

/// `value × factor / P` without forming the full 256-bit product.
///
/// Splits `value = q·P + r` so the result is `q·factor + r·factor / P`,
/// which is exact floor division as long as both partial products fit.
fn mul_div_precision(value: u128, factor: u128) -> Result<u128, AccrualError> {
    let q = value / PRECISION_FACTOR;
    let r = value % PRECISION_FACTOR;
    let high = q.checked_mul(factor).ok_or(AccrualError::Overflow)?;
    let low = r.checked_mul(factor).ok_or(AccrualError::Overflow)? / PRECISION_FACTOR;
    high.checked_add(low).ok_or(AccrualError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rebase_types::DEFAULT_INITIAL_RATE;

    #[test]
    fn factor_is_precision_at_zero_elapsed() {
        assert_eq!(accrued_factor(DEFAULT_INITIAL_RATE, 0).unwrap(), PRECISION_FACTOR);
    }

    #[test]
    fn factor_is_precision_at_zero_rate() {
        assert_eq!(accrued_factor(0, 3600).unwrap(), PRECISION_FACTOR);
    }

    #[test]
    fn factor_grows_linearly() {
        let one = accrued_factor(10, 100).unwrap() - PRECISION_FACTOR;
        let two = accrued_factor(10, 200).unwrap() - PRECISION_FACTOR;
        assert_eq!(two, 2 * one);
    }

    #[test]
    fn one_hour_at_default_rate() {
        // 5e10 * 3600 = 1.8e14 => growth of 1.8e-4 on the principal
        let balance = displayed_balance(100_000, DEFAULT_INITIAL_RATE, 3600).unwrap();
        assert_eq!(balance, 100_018);
    }

    #[test]
    fn zero_principal_stays_zero() {
        assert_eq!(displayed_balance(0, DEFAULT_INITIAL_RATE, 1_000_000).unwrap(), 0);
    }

    #[test]
    fn rounds_down() {
        // 1 unit at 5e-8/s needs 2e7 seconds to earn a whole unit
        assert_eq!(pending_interest(1, DEFAULT_INITIAL_RATE, 19_999_999).unwrap(), 0);
        assert_eq!(pending_interest(1, DEFAULT_INITIAL_RATE, 20_000_000).unwrap(), 1);
    }

    #[test]
    fn eighteen_decimal_principal_does_not_overflow() {
        // 10^9 whole tokens at 18 decimals, one year of accrual
        let principal = 1_000_000_000u128 * PRECISION_FACTOR;
        let accrued = accrue(principal, DEFAULT_INITIAL_RATE, 365 * 24 * 3600).unwrap();
        assert!(accrued.interest > 0);
        assert_eq!(accrued.balance, accrued.principal + accrued.interest);
    }

    #[test]
    fn overflowing_product_is_an_error() {
        let err = displayed_balance(u128::MAX, PRECISION_FACTOR, 10).unwrap_err();
        assert_eq!(err, AccrualError::Overflow);
    }

    #[test]
    fn overflowing_rate_is_an_error() {
        assert_eq!(accrued_factor(u128::MAX, 2).unwrap_err(), AccrualError::Overflow);
    }

    #[test]
    fn longest_representable_window_still_accrues() {
        // 5e10 * u64::MAX is about 9.2e29, well inside u128
        let factor = accrued_factor(DEFAULT_INITIAL_RATE, u64::MAX).unwrap();
        assert!(factor > PRECISION_FACTOR);
        let accrued = accrue(100_000, DEFAULT_INITIAL_RATE, u64::MAX).unwrap();
        assert!(accrued.interest > 0);
        assert_eq!(accrued.balance, accrued.principal + accrued.interest);
    }

    #[test]
    fn century_old_balance_accrues_linearly() {
        let century = 100 * 365 * 24 * 60 * 60;
        let at = displayed_balance(100_000, DEFAULT_INITIAL_RATE, century).unwrap();
        let past = displayed_balance(100_000, DEFAULT_INITIAL_RATE, century + 1).unwrap();
        assert_eq!(at, 15_868_000);
        assert!(past >= at);
    }
}
