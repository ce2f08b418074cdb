//! # Owner Identifiers
//!
//! Snapshot addresses arrive as `0x`-prefixed hex (EVM addresses) or as
//! decimal strings. Both are interpreted as unsigned integers and must fit
//! the hash field before they can be committed.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EncodingError;
use crate::field::FieldElement;

/// A liability owner, held as the integer its address denotes.
///
/// The address text from the snapshot is kept for display and re-serialization
/// so exported proofs reference the same address string the snapshot did.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct OwnerId {
    value: BigUint,
    text: String,
}

impl OwnerId {
    /// Parse an address in `0x` hex or decimal form.
    pub fn parse(s: &str) -> Result<Self, EncodingError> {
        let trimmed = s.trim();
        let invalid = || EncodingError::InvalidInteger {
            what: "owner",
            input: s.to_string(),
        };
        let value = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex) => {
                if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                    return Err(invalid());
                }
                BigUint::parse_bytes(hex.as_bytes(), 16).ok_or_else(invalid)?
            }
            None => {
                if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid());
                }
                BigUint::parse_bytes(trimmed.as_bytes(), 10).ok_or_else(invalid)?
            }
        };
        Ok(Self {
            value,
            text: trimmed.to_string(),
        })
    }

    /// An owner identified directly by a small integer.
    pub fn from_u64(value: u64) -> Self {
        Self {
            value: BigUint::from(value),
            text: value.to_string(),
        }
    }

    /// The integer value of the identifier.
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    /// The identifier as it appeared in the snapshot.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Encode into the hash field, failing on overflow.
    pub fn to_field(&self) -> Result<FieldElement, EncodingError> {
        FieldElement::from_biguint(&self.value, "owner")
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Debug for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OwnerId({})", self.text)
    }
}

impl FromStr for OwnerId {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for OwnerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for OwnerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
