//! The value a bridged transfer carries.

use rebase_types::{Address, Rate};
use serde::{Deserialize, Serialize};

use crate::codec::{self, CodecError};

/// Amount and rate burned on the source chain, to be minted on the
/// destination chain with the same rate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgePayload {
    /// Base units burned on the source ledger.
    pub amount: u128,
    /// The sender's assigned rate at send time.
    pub rate: Rate,
    /// Holder to mint to on the destination ledger.
    pub recipient: Address,
    /// Holder the amount was burned from.
    pub original_sender: Address,
}

impl BridgePayload {
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        codec::encode(self)
    }

    pub fn decode(data: &[u8]) -> Result<Self, CodecError> {
        codec::decode(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_survives_the_wire() {
        let payload = BridgePayload {
            amount: 100_018,
            rate: 50_000_000_000,
            recipient: Address::new("bob"),
            original_sender: Address::new("alice"),
        };
        let bytes = payload.encode().unwrap();
        assert_eq!(BridgePayload::decode(&bytes).unwrap(), payload);
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            BridgePayload::decode(&[0xff; 3]),
            Err(CodecError::Malformed(_))
        ));
    }
}
