//! Accrual-specific errors.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccrualError {
    #[error("arithmetic overflow in accrual computation")]
    Overflow,
}
