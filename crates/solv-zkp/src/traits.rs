//! # Proof System Trait
//!
//! The interface every proving backend satisfies. A backend receives the
//! assembled [`AuditSubmissionInput`] and returns a proof together with the
//! public signals the proof commits to, in the order the verifier contract
//! expects them.
//!
//! The trait is deliberately open: the production prover is an external
//! circom/snarkjs process, wrapped by the operator's own backend type, and
//! tests substitute [`MockProofSystem`](crate::mock::MockProofSystem).
//!
//! ## Contract
//!
//! - `prove` must not succeed when the witness does not satisfy the circuit,
//!   in particular when `bankBalance < totalIssuance`.
//! - `verify` returns `Ok(false)` for a well-formed proof that does not
//!   check out, and `Err(VerifyError::MalformedProof)` for one that cannot be
//!   interpreted at all.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use solv_core::{Amount, FieldElement};
use thiserror::Error;

use crate::input::AuditSubmissionInput;

/// Error during proof generation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofError {
    /// The circuit inputs are invalid or missing.
    #[error("invalid circuit inputs: {0}")]
    InvalidInputs(String),
    /// The witness does not satisfy the solvency constraint.
    #[error("unsatisfiable witness: reserve balance {reserve} is below total liabilities {liabilities}")]
    Unsatisfied {
        /// Attested reserve balance.
        reserve: Amount,
        /// Committed total liabilities.
        liabilities: Amount,
    },
    /// Proof generation failed internally.
    #[error("proof generation failed: {0}")]
    GenerationFailed(String),
}

/// Error during proof verification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// The proof is structurally malformed.
    #[error("malformed proof: {0}")]
    MalformedProof(String),
    /// Verification could not be carried out.
    #[error("proof verification failed: {0}")]
    VerificationFailed(String),
}

/// A proof and the public signals it was generated against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofArtifact<P> {
    /// Backend-specific proof.
    pub proof: P,
    /// Public signals in verifier order.
    pub public_signals: Vec<FieldElement>,
}

/// A zero-knowledge proving backend for the solvency circuit.
///
/// ## Associated Types
///
/// - **`Proof`**: the proof artifact produced by `prove()`.
/// - **`VerifyingKey`**: distributed to verifiers; cloneable.
/// - **`ProvingKey`**: used to generate proofs. May be large.
pub trait ProofSystem: Send + Sync {
    /// The proof type produced by this system.
    type Proof: Serialize + DeserializeOwned + Clone + std::fmt::Debug;
    /// The verifying key type.
    type VerifyingKey: Clone;
    /// The proving key type.
    type ProvingKey;

    /// Generate a proof for the assembled input.
    ///
    /// # Errors
    ///
    /// - [`ProofError::Unsatisfied`] if reserves do not cover liabilities.
    /// - [`ProofError::InvalidInputs`] if the input is malformed.
    /// - [`ProofError::GenerationFailed`] if the backend fails.
    fn prove(
        &self,
        pk: &Self::ProvingKey,
        input: &AuditSubmissionInput,
    ) -> Result<ProofArtifact<Self::Proof>, ProofError>;

    /// Verify a proof against its public signals.
    ///
    /// # Errors
    ///
    /// [`VerifyError::MalformedProof`] if the proof cannot be interpreted.
    fn verify(
        &self,
        vk: &Self::VerifyingKey,
        proof: &Self::Proof,
        public_signals: &[FieldElement],
    ) -> Result<bool, VerifyError>;
}
