//! # Audit Submission Input
//!
//! The flat set of named field elements handed to the external prover. The
//! names and their order are a contract with the circuit and must not
//! change:
//!
//! | # | name            | visibility | source                          |
//! |---|-----------------|------------|---------------------------------|
//! | 0 | `bankPubKeyAx`  | private    | attestation public key, x       |
//! | 1 | `bankPubKeyAy`  | private    | attestation public key, y       |
//! | 2 | `bankBalance`   | private    | attested reserve balance        |
//! | 3 | `bankSigR8x`    | private    | signature `R8.x`                |
//! | 4 | `bankSigR8y`    | private    | signature `R8.y`                |
//! | 5 | `bankSigS`      | private    | signature `S`                   |
//! | 6 | `totalIssuance` | public     | root sum of the liability tree  |
//!
//! `totalIssuance` is the tree's root sum, not the on-chain supply. The two
//! are equal only because the anchor check runs first; assembling from an
//! unchecked root is a caller bug.

use serde::{Deserialize, Serialize};
use solv_core::{EncodingError, FieldElement};
use solv_crypto::TreeNode;
use thiserror::Error;

use crate::attestation::ReserveAttestation;

/// Field names in circuit order.
pub const INPUT_FIELD_NAMES: [&str; 7] = [
    "bankPubKeyAx",
    "bankPubKeyAy",
    "bankBalance",
    "bankSigR8x",
    "bankSigR8y",
    "bankSigS",
    "totalIssuance",
];

/// Whether a circuit input is revealed to the verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputVisibility {
    /// Published alongside the proof.
    Public,
    /// Witness only.
    Private,
}

/// Error assembling the prover input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    /// A value does not fit the hash field.
    #[error("encoding overflow: {what} value {value} does not fit the hash field")]
    EncodingOverflow {
        /// Which input overflowed.
        what: &'static str,
        /// Decimal rendering of the rejected value.
        value: String,
    },
    /// A value was not a valid integer.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<EncodingError> for AssemblyError {
    fn from(err: EncodingError) -> Self {
        match err {
            EncodingError::Overflow { what, value } => AssemblyError::EncodingOverflow { what, value },
            other @ EncodingError::InvalidInteger { .. } => {
                AssemblyError::InvalidInput(other.to_string())
            }
        }
    }
}

/// The ordered input record for the solvency circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSubmissionInput {
    #[serde(rename = "bankPubKeyAx")]
    pub bank_pub_key_ax: FieldElement,
    #[serde(rename = "bankPubKeyAy")]
    pub bank_pub_key_ay: FieldElement,
    #[serde(rename = "bankBalance")]
    pub bank_balance: FieldElement,
    #[serde(rename = "bankSigR8x")]
    pub bank_sig_r8x: FieldElement,
    #[serde(rename = "bankSigR8y")]
    pub bank_sig_r8y: FieldElement,
    #[serde(rename = "bankSigS")]
    pub bank_sig_s: FieldElement,
    #[serde(rename = "totalIssuance")]
    pub total_issuance: FieldElement,
}

/// Build the prover input from an attestation and the tree root.
///
/// The root must already have passed the anchor check. No value is
/// recomputed or transformed beyond field encoding.
///
/// # Errors
///
/// [`AssemblyError::EncodingOverflow`] if the reserve balance or the root sum
/// does not fit the field.
pub fn assemble(
    attestation: &ReserveAttestation,
    root: &TreeNode,
) -> Result<AuditSubmissionInput, AssemblyError> {
    Ok(AuditSubmissionInput {
        bank_pub_key_ax: attestation.custodian_public_key.ax,
        bank_pub_key_ay: attestation.custodian_public_key.ay,
        bank_balance: attestation.reserve_balance.to_field("reserve balance")?,
        bank_sig_r8x: attestation.signature.r8x,
        bank_sig_r8y: attestation.signature.r8y,
        bank_sig_s: attestation.signature.s,
        total_issuance: root.sum.to_field("total issuance")?,
    })
}

impl AuditSubmissionInput {
    /// `(name, value)` pairs in circuit order.
    pub fn entries(&self) -> [(&'static str, FieldElement); 7] {
        [
            ("bankPubKeyAx", self.bank_pub_key_ax),
            ("bankPubKeyAy", self.bank_pub_key_ay),
            ("bankBalance", self.bank_balance),
            ("bankSigR8x", self.bank_sig_r8x),
            ("bankSigR8y", self.bank_sig_r8y),
            ("bankSigS", self.bank_sig_s),
            ("totalIssuance", self.total_issuance),
        ]
    }

    /// Visibility of an input by name. `None` for unknown names.
    pub fn visibility(name: &str) -> Option<InputVisibility> {
        match name {
            "totalIssuance" => Some(InputVisibility::Public),
            n if INPUT_FIELD_NAMES.contains(&n) => Some(InputVisibility::Private),
            _ => None,
        }
    }

    /// Values of the public inputs, in circuit order.
    pub fn public_signals(&self) -> Vec<FieldElement> {
        self.entries()
            .into_iter()
            .filter(|(name, _)| Self::visibility(name) == Some(InputVisibility::Public))
            .map(|(_, value)| value)
            .collect()
    }
}
