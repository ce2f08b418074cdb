//! Audit-cycle error types.
//!
//! File errors carry the path that failed. Errors from the commitment and
//! proving layers are wrapped unchanged so callers can still match on
//! `SupplyMismatch`, `EncodingOverflow`, or `Unsatisfied`.

use std::path::PathBuf;

use solv_core::CanonicalizationError;
use solv_crypto::TreeError;
use solv_zkp::{AssemblyError, ProofError};
use thiserror::Error;

/// Errors that can occur while running an audit cycle.
#[derive(Debug, Error)]
pub enum AuditError {
    /// A required file was not found.
    #[error("required file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Reading or writing a file failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON parsing failed.
    #[error("failed to parse JSON at {path}: {source}")]
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// YAML parsing failed.
    #[error("failed to parse YAML at {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// Serializing an artifact failed.
    #[error("failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        source: serde_json::Error,
    },

    /// The snapshot lists the same owner twice.
    #[error("duplicate owner {owner} at snapshot positions {first} and {second}")]
    DuplicateOwner {
        owner: String,
        first: usize,
        second: usize,
    },

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The submission target refused the payload.
    #[error("submission failed: {0}")]
    Submission(String),

    /// Tree construction or the anchor check failed.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// Prover input assembly failed.
    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    /// The proving backend refused or failed.
    #[error(transparent)]
    Proof(#[from] ProofError),

    /// Canonicalization error (delegated from solv-core).
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

/// Convenience alias for audit results.
pub type AuditResult<T> = Result<T, AuditError>;
