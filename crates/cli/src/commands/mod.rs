//! Subcommand implementations.
//!
//! Each function takes the loaded [`AppState`](dishdash_client::state::AppState)
//! and prints a plain-text result to stdout. Logs go to stderr.

pub mod addresses;
pub mod cart;
pub mod catalog;
pub mod favorites;
pub mod location;
pub mod orders;
pub mod prefs;

use rust_decimal::Decimal;
use thiserror::Error;

use dishdash_client::error::AppError;
use dishdash_core::Price;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The client rejected or failed the operation.
    #[error(transparent)]
    App(#[from] AppError),

    /// A command-line argument could not be parsed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Format an amount for display in the store currency.
pub(crate) fn money(amount: Decimal) -> Price {
    Price::from_amount(amount)
}
