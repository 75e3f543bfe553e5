//! Pool configuration with TOML file support.

use std::path::Path;

use rebase_messages::FeeAsset;
use rebase_types::{Address, ChainSelector};
use serde::{Deserialize, Serialize};

use crate::chain::ChainUpdate;
use crate::error::BridgeError;

/// Configuration for one token pool.
///
/// Can be loaded from a TOML file via [`PoolConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// The pool's own address. It mints and burns under this identity.
    pub address: Address,

    /// Chain this pool lives on.
    pub local_chain: ChainSelector,

    /// Asset transport fees are paid in.
    #[serde(default = "default_fee_asset")]
    pub fee_asset: FeeAsset,

    /// Initial remote-chain allow-list.
    #[serde(default)]
    pub chains: Vec<ChainUpdate>,
}

fn default_fee_asset() -> FeeAsset {
    FeeAsset::new("NATIVE")
}

impl PoolConfig {
    pub fn new(address: Address, local_chain: ChainSelector) -> Self {
        Self {
            address,
            local_chain,
            fee_asset: default_fee_asset(),
            chains: Vec::new(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, BridgeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| BridgeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, BridgeError> {
        let config: Self = toml::from_str(s).map_err(|e| BridgeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, BridgeError> {
        toml::to_string_pretty(self).map_err(|e| BridgeError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), BridgeError> {
        if !self.address.is_valid() {
            return Err(BridgeError::Config("pool address is empty or malformed".into()));
        }
        for update in &self.chains {
            if update.remote_chain == self.local_chain {
                return Err(BridgeError::Config(format!(
                    "{} is the local chain",
                    update.remote_chain
                )));
            }
            update.validate()?;
        }
        Ok(())
    }
}

/// Base-unit amounts in config files.
///
/// TOML integers stop at `i64::MAX`, so larger amounts are written as
/// decimal strings. Both forms are accepted on input.
pub(crate) mod serde_amount {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        match i64::try_from(*value) {
            Ok(small) => serializer.serialize_i64(small),
            Err(_) => serializer.serialize_str(&value.to_string()),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }

    struct AmountVisitor;

    impl<'de> Visitor<'de> for AmountVisitor {
        type Value = u128;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer or decimal string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u128, E> {
            Ok(u128::from(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u128, E> {
            u128::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<u128, E> {
            Ok(v)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u128, E> {
            v.parse()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }
}
