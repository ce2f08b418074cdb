//! # Mock Proof System
//!
//! A deterministic, transparent backend for development and testing.
//! Produces SHA-256 "proofs" that are verifiable but provide **no
//! zero-knowledge guarantees**.
//!
//! ## How It Works
//!
//! - `prove()` checks `bankBalance >= totalIssuance` in the clear, then
//!   computes `SHA256(canonical({ circuit, publicSignals }))`.
//! - `verify()` recomputes the same digest and checks equality.
//!
//! ## Security Warning
//!
//! **NOT PRIVATE.** Anyone can recompute the proof from the public signals,
//! and the signature is never checked. The on-chain verifier will reject
//! these proofs.

use serde::{Deserialize, Serialize};
use solv_core::{sha256_hex, Amount, CanonicalBytes, FieldElement};

use crate::input::AuditSubmissionInput;
use crate::traits::{ProofArtifact, ProofError, ProofSystem, VerifyError};

/// Circuit identifier bound into every mock proof.
pub const MOCK_CIRCUIT_ID: &str = "solvency-audit-v1";

/// A mock proof: hex SHA-256 digest of the circuit id and public signals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MockProof {
    /// Hex-encoded SHA-256 digest.
    pub proof_hex: String,
}

/// Mock verifying key. Carries no material.
#[derive(Debug, Clone, Default)]
pub struct MockVerifyingKey;

/// Mock proving key. Carries no material.
#[derive(Debug, Clone, Default)]
pub struct MockProvingKey;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MockStatement<'a> {
    circuit: &'a str,
    public_signals: &'a [FieldElement],
}

/// Deterministic mock backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockProofSystem;

impl MockProofSystem {
    fn digest(public_signals: &[FieldElement]) -> Result<String, String> {
        let canonical = CanonicalBytes::new(&MockStatement {
            circuit: MOCK_CIRCUIT_ID,
            public_signals,
        })
        .map_err(|e| e.to_string())?;
        Ok(sha256_hex(&canonical))
    }
}

impl ProofSystem for MockProofSystem {
    type Proof = MockProof;
    type VerifyingKey = MockVerifyingKey;
    type ProvingKey = MockProvingKey;

    fn prove(
        &self,
        _pk: &Self::ProvingKey,
        input: &AuditSubmissionInput,
    ) -> Result<ProofArtifact<Self::Proof>, ProofError> {
        let reserve = input.bank_balance.to_biguint();
        let liabilities = input.total_issuance.to_biguint();
        if reserve < liabilities {
            return Err(ProofError::Unsatisfied {
                reserve: Amount::new(reserve),
                liabilities: Amount::new(liabilities),
            });
        }

        let public_signals = input.public_signals();
        let proof_hex = Self::digest(&public_signals).map_err(|e| {
            ProofError::GenerationFailed(format!("failed to canonicalize statement: {e}"))
        })?;

        Ok(ProofArtifact {
            proof: MockProof { proof_hex },
            public_signals,
        })
    }

    fn verify(
        &self,
        _vk: &Self::VerifyingKey,
        proof: &Self::Proof,
        public_signals: &[FieldElement],
    ) -> Result<bool, VerifyError> {
        if proof.proof_hex.len() != 64 {
            return Err(VerifyError::MalformedProof(format!(
                "expected 64 hex chars, got {}",
                proof.proof_hex.len()
            )));
        }
        if !proof.proof_hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(VerifyError::MalformedProof(
                "proof_hex contains non-hex characters".to_string(),
            ));
        }

        let expected = Self::digest(public_signals).map_err(VerifyError::VerificationFailed)?;
        Ok(proof.proof_hex.eq_ignore_ascii_case(&expected))
    }
}
