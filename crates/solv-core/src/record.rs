//! # Liability Records and Audit Anchors
//!
//! A `LiabilityRecord` is one `(owner, balance)` pair from a frozen balance
//! snapshot. An `AuditAnchor` is the externally observed total supply at the
//! snapshot height that the committed liabilities must add up to.

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::error::EncodingError;
use crate::field::FieldElement;
use crate::identity::OwnerId;

/// One liability: an owner and the balance owed to them.
///
/// Immutable once read from the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiabilityRecord {
    /// The owner's identifier (address).
    #[serde(rename = "address")]
    pub owner: OwnerId,
    /// The balance owed to the owner.
    pub balance: Amount,
}

impl LiabilityRecord {
    /// Create a record.
    pub fn new(owner: OwnerId, balance: Amount) -> Self {
        Self { owner, balance }
    }

    /// Encode `(owner, balance)` as the two field inputs of the leaf hash.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError::Overflow`] when either value is `>= r`.
    pub fn field_inputs(&self) -> Result<[FieldElement; 2], EncodingError> {
        Ok([self.owner.to_field()?, self.balance.to_field("balance")?])
    }
}

/// The externally supplied ground truth for one audit cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditAnchor {
    /// On-chain total supply at `block_height`.
    pub total_supply: Amount,
    /// Block height of the snapshot.
    pub block_height: u64,
}

impl AuditAnchor {
    /// Create an anchor.
    pub fn new(total_supply: Amount, block_height: u64) -> Self {
        Self {
            total_supply,
            block_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_uses_snapshot_field_names() {
        let json = r#"{"address":"0x05","balance":"100"}"#;
        let record: LiabilityRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.owner.value(), &num_bigint::BigUint::from(5u8));
        assert_eq!(record.balance, Amount::from(100u64));
    }

    #[test]
    fn field_inputs_encode_owner_then_balance() {
        let record = LiabilityRecord::new(OwnerId::from_u64(5), Amount::from(100u64));
        let [owner, balance] = record.field_inputs().unwrap();
        assert_eq!(owner, FieldElement::from_u64(5));
        assert_eq!(balance, FieldElement::from_u64(100));
    }

    #[test]
    fn field_inputs_reject_oversized_balance() {
        let record = LiabilityRecord::new(
            OwnerId::from_u64(1),
            Amount::new(crate::field::field_modulus().clone()),
        );
        assert!(record.field_inputs().is_err());
    }

    #[test]
    fn anchor_serializes_camel_case() {
        let anchor = AuditAnchor::new(Amount::from(7u64), 12);
        let v = serde_json::to_value(&anchor).unwrap();
        assert_eq!(v["totalSupply"], "7");
        assert_eq!(v["blockHeight"], 12);
    }
}
