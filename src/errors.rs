//! Error types shared by the mortgage, tax and projection modules

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Rejected caller input. Raised before any arithmetic happens.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidInput {
    #[error("{field} cannot be negative (got {value})")]
    NegativeAmount {
        field: &'static str,
        value: f64,
    },

    #[error("{field} must be a finite number")]
    NonFinite {
        field: &'static str,
    },

    #[error("tax calculations for year {year} are not supported; use one of {supported:?}")]
    UnsupportedTaxYear {
        year: u16,
        supported: Vec<u16>,
    },

    #[error("income type {0:?} is not supported; use \"wage\", \"self_employment\" or \"pension\"")]
    UnsupportedIncomeType(String),

    #[error("loan term must be at least one year (got {0})")]
    InvalidLoanTerm(u32),

    #[error("{0} step must be greater than zero")]
    ZeroStep(&'static str),

    #[error("{field} thresholds for tax year {year} must be strictly ascending")]
    UnsortedBrackets {
        field: &'static str,
        year: u16,
    },
}

/// Top-level crate error
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True when the error came from input validation rather than I/O
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }
}

/// Reject negative or non-finite money amounts
pub(crate) fn ensure_non_negative(field: &'static str, value: f64) -> std::result::Result<(), InvalidInput> {
    if !value.is_finite() {
        return Err(InvalidInput::NonFinite { field });
    }
    if value < 0.0 {
        return Err(InvalidInput::NegativeAmount { field, value });
    }
    Ok(())
}
