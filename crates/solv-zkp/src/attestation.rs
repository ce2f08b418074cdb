//! # Reserve Attestations
//!
//! A custodian states its reserve balance and signs it with an EdDSA
//! (Baby Jubjub, Poseidon-hashed) key. The message is exactly
//! `H(reserveBalance)`, a 1-input Poseidon of the balance, with no
//! binding to an auditor, period, or nonce.
//!
//! This crate never signs and never checks the signature: the external
//! circuit verifies it as part of the proof. Attestations are parsed in one
//! of two shapes:
//!
//! ```text
//! structured: { "custodianPublicKey": [Ax, Ay], "reserveBalance": "…",
//!               "signature": { "R8x": "…", "R8y": "…", "S": "…" } }
//! flat:       { "bankPubKeyAx", "bankPubKeyAy", "bankBalance",
//!               "bankSigR8x", "bankSigR8y", "bankSigS" }
//! ```

use serde::{Deserialize, Serialize};
use solv_core::{Amount, FieldElement};
use solv_crypto::{FieldHasher, TreeError};

/// The custodian's EdDSA public key `(Ax, Ay)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[FieldElement; 2]", into = "[FieldElement; 2]")]
pub struct CustodianPublicKey {
    /// X coordinate.
    pub ax: FieldElement,
    /// Y coordinate.
    pub ay: FieldElement,
}

impl From<[FieldElement; 2]> for CustodianPublicKey {
    fn from([ax, ay]: [FieldElement; 2]) -> Self {
        Self { ax, ay }
    }
}

impl From<CustodianPublicKey> for [FieldElement; 2] {
    fn from(key: CustodianPublicKey) -> Self {
        [key.ax, key.ay]
    }
}

/// EdDSA signature components as produced by circomlibjs `signPoseidon`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EddsaSignature {
    /// X coordinate of `R8`.
    #[serde(rename = "R8x")]
    pub r8x: FieldElement,
    /// Y coordinate of `R8`.
    #[serde(rename = "R8y")]
    pub r8y: FieldElement,
    /// Scalar `S`.
    #[serde(rename = "S")]
    pub s: FieldElement,
}

/// A signed statement of the custodian's reserves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveAttestation {
    /// Signer's public key.
    pub custodian_public_key: CustodianPublicKey,
    /// Attested reserve balance.
    pub reserve_balance: Amount,
    /// Signature over `H(reserve_balance)`.
    pub signature: EddsaSignature,
}

impl ReserveAttestation {
    /// The signed message `H(reserveBalance)`.
    ///
    /// # Errors
    ///
    /// [`TreeError::EncodingOverflow`] if the balance does not fit the field.
    pub fn message(&self) -> Result<FieldElement, TreeError> {
        let mut hasher = FieldHasher::new()?;
        hasher.hash1(self.reserve_balance.to_field("reserve balance")?)
    }
}

/// The flat `bank*` attestation layout written by custodian tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatAttestation {
    /// Public key X.
    #[serde(rename = "bankPubKeyAx")]
    pub bank_pub_key_ax: FieldElement,
    /// Public key Y.
    #[serde(rename = "bankPubKeyAy")]
    pub bank_pub_key_ay: FieldElement,
    /// Reserve balance.
    #[serde(rename = "bankBalance")]
    pub bank_balance: Amount,
    /// Signature `R8.x`.
    #[serde(rename = "bankSigR8x")]
    pub bank_sig_r8x: FieldElement,
    /// Signature `R8.y`.
    #[serde(rename = "bankSigR8y")]
    pub bank_sig_r8y: FieldElement,
    /// Signature `S`.
    #[serde(rename = "bankSigS")]
    pub bank_sig_s: FieldElement,
}

impl From<FlatAttestation> for ReserveAttestation {
    fn from(flat: FlatAttestation) -> Self {
        Self {
            custodian_public_key: CustodianPublicKey {
                ax: flat.bank_pub_key_ax,
                ay: flat.bank_pub_key_ay,
            },
            reserve_balance: flat.bank_balance,
            signature: EddsaSignature {
                r8x: flat.bank_sig_r8x,
                r8y: flat.bank_sig_r8y,
                s: flat.bank_sig_s,
            },
        }
    }
}

/// Either accepted attestation layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AttestationDocument {
    /// `{ custodianPublicKey, reserveBalance, signature }`.
    Structured(ReserveAttestation),
    /// `{ bankPubKeyAx, …, bankSigS }`.
    Flat(FlatAttestation),
}

impl AttestationDocument {
    /// Normalize to a [`ReserveAttestation`].
    pub fn into_attestation(self) -> ReserveAttestation {
        match self {
            AttestationDocument::Structured(a) => a,
            AttestationDocument::Flat(f) => f.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn structured_json() -> serde_json::Value {
        json!({
            "custodianPublicKey": ["11", "22"],
            "reserveBalance": "1500000",
            "signature": { "R8x": "33", "R8y": "44", "S": "55" }
        })
    }

    #[test]
    fn parses_structured_layout() {
        let doc: AttestationDocument = serde_json::from_value(structured_json()).unwrap();
        let a = doc.into_attestation();
        assert_eq!(a.custodian_public_key.ax, FieldElement::from_u64(11));
        assert_eq!(a.custodian_public_key.ay, FieldElement::from_u64(22));
        assert_eq!(a.reserve_balance, Amount::from(1_500_000u64));
        assert_eq!(a.signature.s, FieldElement::from_u64(55));
    }

    #[test]
    fn parses_flat_layout() {
        let flat = json!({
            "bankPubKeyAx": "11",
            "bankPubKeyAy": "22",
            "bankBalance": "1500000",
            "bankSigR8x": "33",
            "bankSigR8y": "44",
            "bankSigS": "55"
        });
        let from_flat = serde_json::from_value::<AttestationDocument>(flat)
            .unwrap()
            .into_attestation();
        let from_structured = serde_json::from_value::<AttestationDocument>(structured_json())
            .unwrap()
            .into_attestation();
        assert_eq!(from_flat, from_structured);
    }

    #[test]
    fn structured_round_trip_keeps_key_as_pair() {
        let a: ReserveAttestation = serde_json::from_value(structured_json()).unwrap();
        let v = serde_json::to_value(&a).unwrap();
        assert_eq!(v, structured_json());
    }

    #[test]
    fn rejects_float_balance() {
        let mut v = structured_json();
        v["reserveBalance"] = json!(1.5);
        assert!(serde_json::from_value::<AttestationDocument>(v).is_err());
    }

    #[test]
    fn message_is_single_input_poseidon_of_balance() {
        let a: ReserveAttestation = serde_json::from_value(structured_json()).unwrap();
        let expected = solv_crypto::poseidon_hash(&[FieldElement::from_u64(1_500_000)]).unwrap();
        assert_eq!(a.message().unwrap(), expected);
    }
}
