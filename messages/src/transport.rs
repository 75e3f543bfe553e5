//! The external message transport, seen from a pool.

use rebase_types::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::message::{InboundMessage, MessageId, OutboundMessage};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("no fee quote available for {0}")]
    FeeQuoteUnavailable(String),

    #[error("insufficient fee allowance: need {required}, have {available}")]
    InsufficientFeeAllowance { required: u128, available: u128 },

    #[error("transport rejected message: {0}")]
    Rejected(String),
}

/// Asset the transport charges its fee in.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeeAsset(String);

impl FeeAsset {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeeAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who pays how much for a send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeePayment {
    pub asset: FeeAsset,
    pub payer: Address,
    pub amount: u128,
}

/// Outbound half of the transport.
///
/// Delivery is asynchronous and at-least-once: a message accepted by
/// [`send`](Transport::send) reaches the destination pool eventually,
/// possibly more than once, always with the same [`MessageId`].
pub trait Transport: Send + Sync {
    /// Fee the transport charges for `message`.
    fn quote_fee(&self, message: &OutboundMessage, asset: &FeeAsset) -> Result<u128, TransportError>;

    /// Queue `message` for delivery, charging `fee`.
    fn send(&self, message: OutboundMessage, fee: FeePayment) -> Result<MessageId, TransportError>;
}

/// Why a pool refused a delivered message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveryRejection {
    pub message_id: MessageId,
    pub reason: String,
}

impl fmt::Display for DeliveryRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "message {} rejected: {}", self.message_id, self.reason)
    }
}

/// Inbound half: what the transport calls on the destination pool.
///
/// A rejection is reported back so the transport can hold or retry the
/// message; it is never silently dropped.
pub trait MessageReceiver: Send + Sync {
    fn on_message(&self, message: &InboundMessage) -> Result<(), DeliveryRejection>;
}
