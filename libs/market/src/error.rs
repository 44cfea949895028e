//! Error types for the marketplace domain

use thiserror::Error;

use crate::draft::FormStep;

/// Errors raised by domain rules before anything reaches the database
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    /// A required field was missing or malformed
    #[error("{0}")]
    Validation(String),

    /// A multi-step form transition that the current step does not allow
    #[error("Cannot {action} from step {step}")]
    InvalidTransition {
        action: &'static str,
        step: FormStep,
    },

    /// A row coming back from the database could not be decoded
    #[error("Malformed {entity} row: {detail}")]
    MalformedRow {
        entity: &'static str,
        detail: String,
    },
}

impl MarketError {
    /// Shorthand for a validation failure
    pub fn validation(msg: impl Into<String>) -> Self {
        MarketError::Validation(msg.into())
    }
}

/// Type alias for Result with MarketError
pub type MarketResult<T> = Result<T, MarketError>;
