//! Error types for the vending machine.
//!
//! Every variant here is a caller contract violation. Operations refused
//! because of the current state are not errors; they come back as
//! [`Outcome`](crate::model::Outcome) values.

use thiserror::Error;

use crate::Amount;
use crate::model::Stock;

/// Top-level error returned by [`VendingController::apply`](super::VendingController::apply).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("insert failed: {0}")]
    Insert(#[from] InsertError),

    #[error("refill failed: {0}")]
    Refill(#[from] RefillError),
}

/// Error while constructing a controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unit price must be positive")]
    ZeroPrice,
}

/// Error during credit insertion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsertError {
    #[error("credit amount must be positive")]
    ZeroAmount,
    #[error("credit {credit} plus {amount} overflows")]
    CreditOverflow { credit: Amount, amount: Amount },
}

/// Error during refill.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefillError {
    #[error("refill count must be positive")]
    ZeroCount,
    #[error("stock {stock} plus {count} overflows")]
    StockOverflow { stock: Stock, count: Stock },
}
