//! # Field Elements — Validated BN254 Scalar Encoding
//!
//! The Poseidon commitments are computed over the BN254 scalar field `Fr`
//! (the field used by circom/snarkjs circuits). Every integer that enters a
//! hash (owner identifiers, balances, subtree sums, reserve balances) is
//! encoded here.
//!
//! ## Security Invariant
//!
//! Values `>= r` are rejected with [`EncodingError::Overflow`]. Reducing them
//! modulo `r` would let two different balances share a commitment, so the
//! conversion fails closed instead.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EncodingError;

/// A BN254 scalar field element, serialized as a decimal string.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldElement(Fr);

/// The BN254 scalar field modulus `r` as an arbitrary-precision integer.
pub fn field_modulus() -> &'static BigUint {
    static MODULUS: OnceLock<BigUint> = OnceLock::new();
    MODULUS.get_or_init(|| BigUint::from_bytes_le(&<Fr as PrimeField>::MODULUS.to_bytes_le()))
}

impl FieldElement {
    /// The additive identity. Used as the commitment of the padding node.
    pub fn zero() -> Self {
        Self(Fr::from(0u64))
    }

    /// Encode a small integer. Always fits the field.
    pub fn from_u64(value: u64) -> Self {
        Self(Fr::from(value))
    }

    /// Encode an arbitrary-precision integer, rejecting values `>= r`.
    ///
    /// `what` names the quantity for the error message.
    pub fn from_biguint(value: &BigUint, what: &'static str) -> Result<Self, EncodingError> {
        if value >= field_modulus() {
            return Err(EncodingError::Overflow {
                what,
                value: value.to_string(),
            });
        }
        Ok(Self(Fr::from_le_bytes_mod_order(&value.to_bytes_le())))
    }

    /// Parse a decimal string such as the ones produced by snarkjs.
    pub fn from_decimal(s: &str, what: &'static str) -> Result<Self, EncodingError> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EncodingError::InvalidInteger {
                what,
                input: s.to_string(),
            });
        }
        let value = BigUint::parse_bytes(trimmed.as_bytes(), 10).ok_or_else(|| {
            EncodingError::InvalidInteger {
                what,
                input: s.to_string(),
            }
        })?;
        Self::from_biguint(&value, what)
    }

    /// The canonical integer representative in `[0, r)`.
    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_le(&self.0.into_bigint().to_bytes_le())
    }

    /// Decimal rendering (the wire format of circom tooling).
    pub fn to_decimal(&self) -> String {
        self.to_biguint().to_string()
    }

    /// 32-byte big-endian encoding.
    pub fn to_bytes32(&self) -> [u8; 32] {
        let be = self.0.into_bigint().to_bytes_be();
        let mut out = [0u8; 32];
        // Fr fits in 254 bits, so the big-endian form is never longer than 32 bytes.
        let offset = out.len().saturating_sub(be.len());
        out[offset..].copy_from_slice(&be[be.len().saturating_sub(32)..]);
        out
    }

    /// On-chain `bytes32` form: `0x` followed by 64 zero-padded hex digits.
    pub fn to_bytes32_hex(&self) -> String {
        let hex: String = self
            .to_bytes32()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect();
        format!("0x{hex}")
    }

    /// Access the underlying arkworks element for hashing.
    pub fn inner(&self) -> Fr {
        self.0
    }

    /// Wrap an arkworks element produced by a hash function.
    pub fn from_inner(fr: Fr) -> Self {
        Self(fr)
    }

    /// Whether this is the zero element.
    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}

impl Default for FieldElement {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal())
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({})", self.to_decimal())
    }
}

impl FromStr for FieldElement {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_decimal(s, "field element")
    }
}

impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_decimal(&s, "field element").map_err(serde::de::Error::custom)
    }
}
