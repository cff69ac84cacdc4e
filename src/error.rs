//! Error types for loading offers and running simulations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanError {
    /// The scheduled payment did not exceed the interest due, so the loan would
    /// never amortize.
    #[error(
        "invalid loan configuration for '{offer}': principal reduction {principal_reduction:.6} \
         at year {year}, month {month} is not positive"
    )]
    InvalidLoanConfiguration {
        offer: String,
        year: u32,
        month: u32,
        principal_reduction: f64,
    },

    #[error("invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LoanError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        LoanError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LoanError>;
