//! Token-bucket rate limiting for bridged amounts.
//!
//! Each allowed remote chain has one bucket per direction. Tokens are base
//! units. They refill at `rate` per second up to `capacity`, computed from
//! the elapsed time at each check; there is no background timer.

use rebase_types::Timestamp;
use serde::{Deserialize, Serialize};

use crate::config::serde_amount;
use crate::error::BridgeError;

/// Bucket parameters for one direction of one remote chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Most base units the bucket can hold.
    #[serde(default, with = "serde_amount")]
    pub capacity: u128,
    /// Base units added per second.
    #[serde(default, with = "serde_amount")]
    pub rate: u128,
}

impl RateLimiterConfig {
    pub fn enabled(capacity: u128, rate: u128) -> Self {
        Self {
            enabled: true,
            capacity,
            rate,
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    /// An enabled limiter needs `0 < rate <= capacity`; a disabled one
    /// must carry no parameters at all.
    pub fn validate(&self) -> Result<(), BridgeError> {
        if self.enabled {
            if self.rate == 0 || self.rate > self.capacity {
                return Err(BridgeError::InvalidRateLimitConfig(format!(
                    "enabled limiter needs 0 < rate <= capacity, got rate {} capacity {}",
                    self.rate, self.capacity
                )));
            }
        } else if self.rate != 0 || self.capacity != 0 {
            return Err(BridgeError::InvalidRateLimitConfig(format!(
                "disabled limiter must have zero rate and capacity, got rate {} capacity {}",
                self.rate, self.capacity
            )));
        }
        Ok(())
    }
}

/// Token bucket over base units.
///
/// Starts full. A disabled bucket admits any amount.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenBucket {
    config: RateLimiterConfig,
    tokens: u128,
    last_refill: Timestamp,
}

impl TokenBucket {
    pub fn new(config: RateLimiterConfig, now: Timestamp) -> Self {
        Self {
            config,
            tokens: config.capacity,
            last_refill: now,
        }
    }

    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }

    /// Tokens available at `now`, without consuming anything.
    pub fn available(&self, now: Timestamp) -> u128 {
        if !self.config.enabled {
            return u128::MAX;
        }
        let elapsed = u128::from(self.last_refill.elapsed_since(now));
        let refill = elapsed.saturating_mul(self.config.rate);
        self.tokens.saturating_add(refill).min(self.config.capacity)
    }

    /// Check that `amount` fits at `now`.
    pub fn check(&self, amount: u128, now: Timestamp) -> Result<(), BridgeError> {
        let available = self.available(now);
        if amount > available {
            return Err(BridgeError::RateLimitExceeded {
                requested: amount,
                available,
            });
        }
        Ok(())
    }

    /// Try to consume `amount` at `now`.
    ///
    /// Returns `true` and consumes the tokens if they are available.
    /// Returns `false` and leaves the bucket unchanged otherwise.
    pub fn try_consume(&mut self, amount: u128, now: Timestamp) -> bool {
        if !self.config.enabled {
            return true;
        }
        let available = self.available(now);
        if amount > available {
            return false;
        }
        self.tokens = available - amount;
        // A clock that went backwards does not move the refill point back.
        self.last_refill = self.last_refill.max(now);
        true
    }
}
