//! # Amounts — Arbitrary-Precision Non-Negative Integers
//!
//! Token balances and supplies routinely exceed `u64` (18-decimal tokens),
//! so every amount is a `BigUint`. There is no floating-point path: serde
//! accepts decimal strings or unsigned JSON integers and rejects everything
//! else, including floats, signs, and exponents.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use num_bigint::BigUint;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EncodingError;
use crate::field::FieldElement;

/// A non-negative arbitrary-precision amount, serialized as a decimal string.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(BigUint);

impl Amount {
    /// The zero amount. Carried by the padding node.
    pub fn zero() -> Self {
        Self(BigUint::from(0u8))
    }

    /// Wrap an existing big integer.
    pub fn new(value: BigUint) -> Self {
        Self(value)
    }

    /// Parse a base-10 integer string. Leading/trailing whitespace is ignored.
    pub fn from_decimal(s: &str) -> Result<Self, EncodingError> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EncodingError::InvalidInteger {
                what: "amount",
                input: s.to_string(),
            });
        }
        BigUint::parse_bytes(trimmed.as_bytes(), 10)
            .map(Self)
            .ok_or_else(|| EncodingError::InvalidInteger {
                what: "amount",
                input: s.to_string(),
            })
    }

    /// Borrow the underlying integer.
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Whether the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == BigUint::from(0u8)
    }

    /// Encode into the hash field. `what` names the quantity on overflow.
    pub fn to_field(&self, what: &'static str) -> Result<FieldElement, EncodingError> {
        FieldElement::from_biguint(&self.0, what)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<BigUint> for Amount {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0 + rhs.0)
    }
}

impl<'a> Add<&'a Amount> for &'a Amount {
    type Output = Amount;

    fn add(self, rhs: &'a Amount) -> Amount {
        Amount(&self.0 + &rhs.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::zero(), |acc, a| acc + a)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Amount {
        iter.fold(Amount::zero(), |acc, a| &acc + a)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amount({})", self.0)
    }
}

impl FromStr for Amount {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_decimal(s)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer as a decimal string or unsigned integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        Amount::from_decimal(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        Ok(Amount::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
        u64::try_from(v)
            .map(Amount::from)
            .map_err(|_| E::custom(format!("negative amount rejected: {v}")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
        Err(E::custom(format!(
            "float amount rejected: {v}; use a decimal string"
        )))
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_values_beyond_u64() {
        let a = Amount::from_decimal("1000000000000000000000000").unwrap();
        assert_eq!(a.to_string(), "1000000000000000000000000");
    }

    #[test]
    fn sum_is_exact() {
        let big = Amount::from_decimal("18446744073709551615").unwrap();
        let total: Amount = [big.clone(), big, Amount::from(2u64)].iter().sum();
        assert_eq!(total.to_string(), "36893488147419103232");
    }

    #[test]
    fn deserializes_string_and_integer() {
        let a: Amount = serde_json::from_str("\"42\"").unwrap();
        let b: Amount = serde_json::from_str("42").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_float_negative_and_garbage() {
        assert!(serde_json::from_str::<Amount>("1.5").is_err());
        assert!(serde_json::from_str::<Amount>("-3").is_err());
        assert!(serde_json::from_str::<Amount>("\"-3\"").is_err());
        assert!(serde_json::from_str::<Amount>("\"1e18\"").is_err());
        assert!(serde_json::from_str::<Amount>("\"\"").is_err());
    }

    #[test]
    fn serializes_as_decimal_string() {
        let a = Amount::from(100u64);
        assert_eq!(serde_json::to_string(&a).unwrap(), "\"100\"");
    }

    #[test]
    fn to_field_rejects_overflow() {
        let over = Amount::new(crate::field::field_modulus().clone());
        assert!(matches!(
            over.to_field("balance"),
            Err(EncodingError::Overflow { what: "balance", .. })
        ));
    }
}
