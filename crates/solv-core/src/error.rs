//! # Error Types
//!
//! Encoding and canonicalization errors raised by the foundational types.
//! All errors use `thiserror` for derive-based `Display` and `Error`.

use thiserror::Error;

/// Error converting an externally supplied value into its typed form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// The value does not fit the BN254 scalar field. Never truncated or
    /// reduced: the caller must abort.
    #[error("{what} value {value} exceeds the field modulus")]
    Overflow {
        /// What was being encoded (e.g. "owner", "balance", "subtree sum").
        what: &'static str,
        /// Decimal rendering of the rejected value.
        value: String,
    },

    /// The text is not a valid non-negative integer in the expected radix.
    #[error("invalid {what} encoding: {input:?}")]
    InvalidInteger {
        /// What was being parsed.
        what: &'static str,
        /// The rejected input text.
        input: String,
    },
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    /// Amounts must be strings or integers.
    #[error("float values are not permitted in canonical representations; use string or integer for amount: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
