//! # Commitment Error Types
//!
//! Every error here is fatal for the audit cycle that raised it. None are
//! retried: rebuilding the same snapshot deterministically fails the same way.

use solv_core::{Amount, EncodingError};
use thiserror::Error;

/// Errors from building or checking a liability sum-tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// An owner, balance, or subtree sum does not fit the hash field.
    #[error("encoding overflow: {what} value {value} does not fit the hash field")]
    EncodingOverflow {
        /// Which quantity overflowed.
        what: &'static str,
        /// Decimal rendering of the rejected value.
        value: String,
    },

    /// A value could not be parsed into its integer form.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The snapshot contained no liabilities. An audit over nothing is undefined.
    #[error("empty liability set: refusing to commit zero records")]
    EmptyLiabilitySet,

    /// The tree's root sum disagrees with the on-chain total supply.
    #[error("supply mismatch: tree sum {tree_sum}, chain supply {chain_supply}")]
    SupplyMismatch {
        /// Sum committed by the tree root.
        tree_sum: Amount,
        /// Total supply reported by the anchor.
        chain_supply: Amount,
    },

    /// The Poseidon backend rejected its inputs or parameters.
    #[error("poseidon error: {0}")]
    Hash(String),

    /// Inclusion proof requested for a leaf that does not exist.
    #[error("leaf index {index} out of range for tree with {leaves} leaves")]
    LeafOutOfRange {
        /// Requested leaf index.
        index: usize,
        /// Number of leaves in the tree.
        leaves: usize,
    },

    /// A builder worker thread panicked.
    #[error("sum-tree worker failed: {0}")]
    Worker(String),
}

impl From<EncodingError> for TreeError {
    fn from(err: EncodingError) -> Self {
        match err {
            EncodingError::Overflow { what, value } => TreeError::EncodingOverflow { what, value },
            other @ EncodingError::InvalidInteger { .. } => TreeError::InvalidInput(other.to_string()),
        }
    }
}
