use proptest::prelude::*;

use rebase_accrual::{accrue, accrued_factor, displayed_balance, pending_interest};
use rebase_types::PRECISION_FACTOR;

proptest! {
    /// Displayed balance never decreases as time passes.
    #[test]
    fn balance_monotonic_in_time(
        principal in 0u128..1_000_000_000_000_000_000_000,
        rate in 0u128..1_000_000_000_000,
        t1 in 0u64..10_000_000,
        dt in 0u64..10_000_000,
    ) {
        let b1 = displayed_balance(principal, rate, t1).unwrap();
        let b2 = displayed_balance(principal, rate, t1 + dt).unwrap();
        prop_assert!(b2 >= b1, "balance must not decrease: b1={}, b2={}", b1, b2);
    }

    /// Displayed balance is never below principal.
    #[test]
    fn balance_at_least_principal(
        principal in any::<u64>(),
        rate in 0u128..1_000_000_000_000,
        elapsed in 0u64..100_000_000,
    ) {
        let principal = principal as u128;
        prop_assert!(displayed_balance(principal, rate, elapsed).unwrap() >= principal);
    }

    /// Two equal consecutive windows earn the same interest within one unit.
    #[test]
    fn equal_windows_equal_growth(
        principal in 1u128..1_000_000_000_000_000_000_000,
        rate in 0u128..1_000_000_000_000,
        window in 1u64..1_000_000,
    ) {
        let b0 = displayed_balance(principal, rate, 0).unwrap();
        let b1 = displayed_balance(principal, rate, window).unwrap();
        let b2 = displayed_balance(principal, rate, 2 * window).unwrap();
        let first = b1 - b0;
        let second = b2 - b1;
        prop_assert!(first.abs_diff(second) <= 1, "first={}, second={}", first, second);
    }

    /// Factor is exactly P + rate × elapsed.
    #[test]
    fn factor_matches_formula(
        rate in 0u128..1_000_000_000_000_000_000,
        elapsed in 0u64..1_000_000_000,
    ) {
        let factor = accrued_factor(rate, elapsed).unwrap();
        prop_assert_eq!(factor, PRECISION_FACTOR + rate * elapsed as u128);
    }

    /// The split multiplication agrees with the naive product when the naive one fits.
    #[test]
    fn split_multiplication_is_exact(
        principal in any::<u64>(),
        rate in 0u128..1_000_000_000_000,
        elapsed in 0u64..1_000_000,
    ) {
        let principal = principal as u128;
        let naive = principal * (PRECISION_FACTOR + rate * elapsed as u128) / PRECISION_FACTOR;
        prop_assert_eq!(displayed_balance(principal, rate, elapsed).unwrap(), naive);
    }

    /// accrue() is consistent with the standalone helpers.
    #[test]
    fn accrue_is_consistent(
        principal in any::<u64>(),
        rate in 0u128..1_000_000_000_000,
        elapsed in 0u64..10_000_000,
    ) {
        let principal = principal as u128;
        let accrued = accrue(principal, rate, elapsed).unwrap();
        prop_assert_eq!(accrued.interest, pending_interest(principal, rate, elapsed).unwrap());
        prop_assert_eq!(accrued.balance, accrued.principal + accrued.interest);
    }

    /// Zero rate produces zero interest.
    #[test]
    fn zero_rate_zero_interest(principal in any::<u128>(), elapsed in 0u64..1_000_000_000) {
        prop_assert_eq!(pending_interest(principal, 0, elapsed).unwrap(), 0);
    }
}
