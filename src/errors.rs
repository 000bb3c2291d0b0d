//! Error types for the fairseed engine
//!
//! Parameter and lifecycle errors surface synchronously to the caller. A failed
//! verification is not an error: it is reported through `VerificationResult`.

use thiserror::Error;

/// Root error type for all fairseed operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FairnessError {
    /// Game or seed parameters outside their valid domain
    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidParameter {
        field: String,
        value: String,
        reason: String,
    },

    /// A nonce that was already consumed for the active pair
    #[error("Nonce reuse: expected {expected}, got {actual}")]
    NonceReuse { expected: u64, actual: u64 },

    /// The seed pair has been revealed and can no longer take bets
    #[error("Seed pair {server_seed_hash} is inactive")]
    PairInactive { server_seed_hash: String },

    /// Seed or hash strings that are not well-formed hex of the right length
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Mines draw limit of {draws} reached before enough unique positions were found")]
    MinesDrawLimit { draws: u32 },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("No active seed pair for player {0}")]
    NotFound(String),
}

impl FairnessError {
    pub fn invalid_parameter(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        FairnessError::InvalidParameter {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Errors that indicate an integration bug on the caller side.
    ///
    /// These must not be retried blindly: retrying with the same nonce or the
    /// same revealed pair reproduces the failure.
    pub fn is_caller_bug(&self) -> bool {
        matches!(
            self,
            FairnessError::NonceReuse { .. } | FairnessError::PairInactive { .. }
        )
    }
}

impl From<hex::FromHexError> for FairnessError {
    fn from(e: hex::FromHexError) -> Self {
        FairnessError::MalformedInput(e.to_string())
    }
}

impl From<toml::de::Error> for FairnessError {
    fn from(e: toml::de::Error) -> Self {
        FairnessError::Configuration(e.to_string())
    }
}

impl From<serde_json::Error> for FairnessError {
    fn from(e: serde_json::Error) -> Self {
        FairnessError::MalformedInput(e.to_string())
    }
}

// Convenience type alias for Results
pub type FairResult<T> = Result<T, FairnessError>;
