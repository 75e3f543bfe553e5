//! Cross-chain message types for the bridge pools.
//!
//! A bridged transfer is two independent state transitions, a burn on the
//! source ledger and a mint on the destination, linked only by the immutable
//! values in this crate. The transport that carries them is external and is
//! reached through the [`Transport`] trait.

pub mod codec;
pub mod message;
pub mod payload;
pub mod transport;

pub use codec::CodecError;
pub use message::{InboundMessage, MessageId, OutboundMessage};
pub use payload::BridgePayload;
pub use transport::{DeliveryRejection, FeeAsset, FeePayment, MessageReceiver, Transport, TransportError};
