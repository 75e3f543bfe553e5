#![no_main]

use libfuzzer_sys::fuzz_target;

use rebase_accrual::{accrue, displayed_balance};

// Accrual over arbitrary principal, rate and window either succeeds with a
// balance no smaller than the principal or reports an error. It never panics.
fuzz_target!(|data: &[u8]| {
    if data.len() < 40 {
        return;
    }

    let principal = u128::from_le_bytes(data[0..16].try_into().unwrap());
    let rate = u128::from_le_bytes(data[16..32].try_into().unwrap());
    let elapsed = u64::from_le_bytes(data[32..40].try_into().unwrap());

    if let Ok(accrued) = accrue(principal, rate, elapsed) {
        assert!(accrued.balance >= principal);
        assert_eq!(accrued.balance, accrued.principal + accrued.interest);
        assert_eq!(displayed_balance(principal, rate, elapsed), Ok(accrued.balance));
    }
});
