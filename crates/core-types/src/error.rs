// In crates/core-types/src/error.rs

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown granularity '{0}' (expected daily, weekly, monthly, quarterly or yearly)")]
    UnknownGranularity(String),

    #[error("Unknown locale '{0}' (expected en or zh)")]
    UnknownLocale(String),

    #[error("Trade id '{id}' appears more than once in account '{account_id}'")]
    DuplicateTradeId { account_id: String, id: String },

    #[error("Account '{id}' has a negative initial capital ({capital})")]
    NegativeCapital { id: String, capital: Decimal },
}

pub type Result<T> = std::result::Result<T, Error>;
