//! # solv-zkp — Proving-Subsystem Boundary
//!
//! This crate does not generate zero-knowledge proofs. It defines the exact
//! contract handed to the external prover and the shapes of what comes back.
//!
//! ## Architecture
//!
//! - **Attestation** (`attestation.rs`): the custodian's signed reserve
//!   statement, consumed as-is. The signed message is `H(reserveBalance)`.
//! - **Input** (`input.rs`): [`AuditSubmissionInput`], the flat, ordered
//!   field set `bankPubKeyAx … totalIssuance`, and [`assemble`], which builds
//!   it from an attestation and an anchor-verified tree root.
//! - **Traits** (`traits.rs`): the [`ProofSystem`] interface every proving
//!   backend satisfies, so backends are interchangeable.
//! - **Mock** (`mock.rs`): [`MockProofSystem`], deterministic and transparent.
//!   It checks `bankBalance >= totalIssuance` in the clear and provides no
//!   zero-knowledge guarantees.
//! - **Groth16** (`groth16.rs`): the snarkjs proof artifact returned by a
//!   real circom/Groth16 prover and its conversion to Solidity calldata.
//!
//! ## Public vs. Private Inputs
//!
//! `totalIssuance` is public and is published on-chain with the root hash.
//! Every `bank*` field is a private witness: the circuit proves the
//! signature and `bankBalance >= totalIssuance` without revealing them.

pub mod attestation;
pub mod groth16;
pub mod input;
#[cfg(feature = "mock")]
pub mod mock;
pub mod traits;

// Re-export primary types.
pub use attestation::{AttestationDocument, CustodianPublicKey, EddsaSignature, ReserveAttestation};
pub use groth16::{Groth16Proof, SolidityCalldata};
pub use input::{assemble, AssemblyError, AuditSubmissionInput, InputVisibility, INPUT_FIELD_NAMES};
#[cfg(feature = "mock")]
pub use mock::MockProofSystem;
pub use traits::{ProofArtifact, ProofError, ProofSystem, VerifyError};
