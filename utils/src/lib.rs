//! Shared utilities for the rebase token protocol.

pub mod logging;

pub use logging::{init_logging, init_tracing, LogFormat, LoggingError};
