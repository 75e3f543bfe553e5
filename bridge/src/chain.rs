//! Remote-chain registry entries.

use rebase_types::{Address, ChainSelector, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::BridgeError;
use crate::rate_limiter::{RateLimiterConfig, TokenBucket};

/// One administrative change to the remote-chain allow-list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainUpdate {
    pub remote_chain: ChainSelector,
    /// `false` removes the chain from the allow-list.
    #[serde(default = "default_true")]
    pub allowed: bool,
    /// Pool on the remote chain that sends to and receives from this one.
    #[serde(default)]
    pub remote_pool: Address,
    /// Token ledger the remote pool mints and burns on.
    #[serde(default)]
    pub remote_token: Address,
    #[serde(default)]
    pub outbound: RateLimiterConfig,
    #[serde(default)]
    pub inbound: RateLimiterConfig,
}

fn default_true() -> bool {
    true
}

impl ChainUpdate {
    /// Allow `remote_chain`, paired with the given remote pool and token.
    pub fn allow(
        remote_chain: ChainSelector,
        remote_pool: Address,
        remote_token: Address,
        outbound: RateLimiterConfig,
        inbound: RateLimiterConfig,
    ) -> Self {
        Self {
            remote_chain,
            allowed: true,
            remote_pool,
            remote_token,
            outbound,
            inbound,
        }
    }

    /// Remove `remote_chain` from the allow-list.
    pub fn remove(remote_chain: ChainSelector) -> Self {
        Self {
            remote_chain,
            allowed: false,
            remote_pool: Address::default(),
            remote_token: Address::default(),
            outbound: RateLimiterConfig::disabled(),
            inbound: RateLimiterConfig::disabled(),
        }
    }

    pub fn validate(&self) -> Result<(), BridgeError> {
        if !self.allowed {
            return Ok(());
        }
        if !self.remote_pool.is_valid() || !self.remote_token.is_valid() {
            return Err(BridgeError::Config(format!(
                "{} needs a remote pool and token address",
                self.remote_chain
            )));
        }
        self.outbound.validate()?;
        self.inbound.validate()
    }
}

/// An allowed remote chain and its live rate-limit budgets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteChain {
    pub selector: ChainSelector,
    pub remote_pool: Address,
    pub remote_token: Address,
    pub outbound: TokenBucket,
    pub inbound: TokenBucket,
}

impl RemoteChain {
    /// Build from an allowing update, with both buckets full at `now`.
    pub fn from_update(update: &ChainUpdate, now: Timestamp) -> Self {
        Self {
            selector: update.remote_chain,
            remote_pool: update.remote_pool.clone(),
            remote_token: update.remote_token.clone(),
            outbound: TokenBucket::new(update.outbound, now),
            inbound: TokenBucket::new(update.inbound, now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removal_needs_no_addresses() {
        assert!(ChainUpdate::remove(ChainSelector::new(9)).validate().is_ok());
    }

    #[test]
    fn allowed_update_needs_addresses() {
        let update = ChainUpdate::allow(
            ChainSelector::new(2),
            Address::default(),
            Address::new("token-b"),
            RateLimiterConfig::disabled(),
            RateLimiterConfig::disabled(),
        );
        assert!(matches!(update.validate(), Err(BridgeError::Config(_))));
    }

    #[test]
    fn allowed_update_checks_limiters() {
        let update = ChainUpdate::allow(
            ChainSelector::new(2),
            Address::new("pool-b"),
            Address::new("token-b"),
            RateLimiterConfig::enabled(10, 0),
            RateLimiterConfig::disabled(),
        );
        assert!(matches!(
            update.validate(),
            Err(BridgeError::InvalidRateLimitConfig(_))
        ));
    }

    #[test]
    fn new_remote_chain_has_full_buckets() {
        let update = ChainUpdate::allow(
            ChainSelector::new(2),
            Address::new("pool-b"),
            Address::new("token-b"),
            RateLimiterConfig::enabled(500, 5),
            RateLimiterConfig::enabled(300, 3),
        );
        let now = Timestamp::new(10);
        let chain = RemoteChain::from_update(&update, now);
        assert_eq!(chain.outbound.available(now), 500);
        assert_eq!(chain.inbound.available(now), 300);
    }
}
