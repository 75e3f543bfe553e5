//! Time source abstraction.

use crate::time::Timestamp;

/// A source of the current time.
///
/// The ledger and the bridge rate limiters read time only through this
/// trait. Production code uses [`SystemClock`]; tests swap in a
/// deterministic clock that advances only when told to.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time in Unix seconds.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}
