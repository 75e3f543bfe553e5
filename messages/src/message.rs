//! Message envelopes and identifiers.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use rebase_types::{Address, ChainSelector};
use serde::{Deserialize, Serialize};
use std::fmt;

type Blake2b256 = Blake2b<U32>;

/// Transport-assigned identifier of one logical transfer.
///
/// Redelivery of the same transfer always carries the same id.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId([u8; 32]);

impl MessageId {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Blake2b-256 over `(source chain, sequence number, payload)`.
    pub fn derive(source: ChainSelector, sequence: u64, data: &[u8]) -> Self {
        let mut hasher = Blake2b256::new();
        hasher.update(source.to_le_bytes());
        hasher.update(sequence.to_le_bytes());
        hasher.update(data);
        let mut out = [0u8; 32];
        out.copy_from_slice(&hasher.finalize());
        Self(out)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageId({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// What a pool hands to the transport.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub destination: ChainSelector,
    /// Pool on the source chain handing the message over.
    pub sender_pool: Address,
    /// Pool on the destination chain that must receive this message.
    pub receiver_pool: Address,
    /// Encoded [`BridgePayload`](crate::BridgePayload).
    pub data: Vec<u8>,
}

/// What the transport hands to a pool on delivery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub message_id: MessageId,
    pub source_chain: ChainSelector,
    /// Pool on the source chain that sent the message.
    pub sender_pool: Address,
    pub data: Vec<u8>,
}
