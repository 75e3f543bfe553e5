//! Bridge adapter: one token pool per chain.
//!
//! A pool burns on the source ledger and hands an immutable
//! [`BridgePayload`](rebase_messages::BridgePayload) to the transport; the
//! pool on the destination chain mints on delivery with the rate carried in
//! the payload, so a holder's assigned rate follows them across chains.
//!
//! The two halves are independent state transitions. Between them the value
//! is in flight: burned on the source, not yet minted on the destination.

pub mod chain;
pub mod config;
pub mod error;
pub mod pool;
pub mod rate_limiter;

pub use chain::{ChainUpdate, RemoteChain};
pub use config::PoolConfig;
pub use error::BridgeError;
pub use pool::{ReceiveOutcome, SendReceipt, TokenPool};
pub use rate_limiter::{RateLimiterConfig, TokenBucket};
