//! # Balance Snapshots
//!
//! A snapshot is the frozen liability set for one audit cycle, as written by
//! the external balance-discovery step:
//!
//! ```json
//! { "blockNumber": 19000000,
//!   "totalSupply": "1500000000000000000000",
//!   "timestamp": 1700000000,
//!   "users": [ { "address": "0xAbC…", "balance": "1000000000000000000" } ] }
//! ```
//!
//! Record order is preserved: it fixes each owner's leaf index and so the
//! root commitment. The snapshot's own sum is not compared with
//! `totalSupply` here; that check belongs to the anchor gate of the cycle.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use solv_core::{sha256_digest, Amount, AuditAnchor, CanonicalBytes, ContentDigest, LiabilityRecord};

use crate::error::{AuditError, AuditResult};
use crate::files::load_json_typed;

/// The liability snapshot at one block height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiabilitySnapshot {
    /// Block height the balances were read at.
    pub block_number: u64,
    /// On-chain total supply at `block_number`.
    pub total_supply: Amount,
    /// Unix time the snapshot was taken, when recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
    /// One record per owner, in leaf order.
    pub users: Vec<LiabilityRecord>,
}

impl LiabilitySnapshot {
    /// The anchor implied by the snapshot header.
    pub fn anchor(&self) -> AuditAnchor {
        AuditAnchor::new(self.total_supply.clone(), self.block_number)
    }

    /// Reject snapshots that list an owner more than once.
    ///
    /// Owners are compared by integer value, so `0x0a` and `10` collide.
    pub fn check_unique_owners(&self) -> AuditResult<()> {
        let mut seen = HashMap::with_capacity(self.users.len());
        for (i, record) in self.users.iter().enumerate() {
            if let Some(first) = seen.insert(record.owner.value().clone(), i) {
                return Err(AuditError::DuplicateOwner {
                    owner: record.owner.to_string(),
                    first,
                    second: i,
                });
            }
        }
        Ok(())
    }

    /// Split into ordered records and the anchor, after the uniqueness check.
    pub fn into_parts(self) -> AuditResult<(Vec<LiabilityRecord>, AuditAnchor)> {
        self.check_unique_owners()?;
        let anchor = self.anchor();
        Ok((self.users, anchor))
    }

    /// SHA-256 digest of the canonical JSON form of the snapshot.
    pub fn digest(&self) -> AuditResult<ContentDigest> {
        Ok(sha256_digest(&CanonicalBytes::new(self)?))
    }
}

/// Where a cycle gets its frozen snapshot from.
pub trait SnapshotSource {
    /// Produce the snapshot for this cycle.
    fn load(&self) -> AuditResult<LiabilitySnapshot>;
}

impl SnapshotSource for LiabilitySnapshot {
    fn load(&self) -> AuditResult<LiabilitySnapshot> {
        Ok(self.clone())
    }
}

/// Reads a snapshot JSON file.
#[derive(Debug, Clone)]
pub struct FileSnapshotSource {
    path: PathBuf,
}

impl FileSnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSource for FileSnapshotSource {
    fn load(&self) -> AuditResult<LiabilitySnapshot> {
        let snapshot: LiabilitySnapshot = load_json_typed(&self.path)?;
        tracing::debug!(
            path = %self.path.display(),
            block = snapshot.block_number,
            users = snapshot.users.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solv_core::OwnerId;

    const SNAPSHOT: &str = r#"{
        "blockNumber": 42,
        "totalSupply": "300",
        "timestamp": 1700000000,
        "users": [
            { "address": "0x00000000000000000000000000000000000000A1", "balance": "100" },
            { "address": "0x00000000000000000000000000000000000000b2", "balance": "200" }
        ]
    }"#;

    #[test]
    fn parses_snapshot_layout() {
        let snapshot: LiabilitySnapshot = serde_json::from_str(SNAPSHOT).unwrap();
        assert_eq!(snapshot.block_number, 42);
        assert_eq!(snapshot.users.len(), 2);
        assert_eq!(snapshot.users[0].owner.value(), OwnerId::from_u64(0xa1).value());
        assert_eq!(snapshot.anchor(), AuditAnchor::new(Amount::from(300u64), 42));
    }

    #[test]
    fn into_parts_preserves_order() {
        let snapshot: LiabilitySnapshot = serde_json::from_str(SNAPSHOT).unwrap();
        let (records, anchor) = snapshot.into_parts().unwrap();
        assert_eq!(records[0].balance, Amount::from(100u64));
        assert_eq!(records[1].balance, Amount::from(200u64));
        assert_eq!(anchor.block_height, 42);
    }

    #[test]
    fn duplicate_owner_is_rejected_across_notations() {
        let snapshot = LiabilitySnapshot {
            block_number: 1,
            total_supply: Amount::from(3u64),
            timestamp: None,
            users: vec![
                LiabilityRecord::new(OwnerId::parse("0x0a").unwrap(), Amount::from(1u64)),
                LiabilityRecord::new(OwnerId::from_u64(7), Amount::from(1u64)),
                LiabilityRecord::new(OwnerId::parse("10").unwrap(), Amount::from(1u64)),
            ],
        };
        match snapshot.into_parts().unwrap_err() {
            AuditError::DuplicateOwner { first, second, .. } => {
                assert_eq!((first, second), (0, 2));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_float_balance() {
        let bad = SNAPSHOT.replace("\"100\"", "100.5");
        assert!(serde_json::from_str::<LiabilitySnapshot>(&bad).is_err());
    }

    #[test]
    fn digest_ignores_key_order_and_whitespace() {
        let a: LiabilitySnapshot = serde_json::from_str(SNAPSHOT).unwrap();
        let reordered = r#"{"users":[{"balance":"100","address":"0x00000000000000000000000000000000000000A1"},{"balance":"200","address":"0x00000000000000000000000000000000000000b2"}],"timestamp":1700000000,"totalSupply":"300","blockNumber":42}"#;
        let b: LiabilitySnapshot = serde_json::from_str(reordered).unwrap();
        assert_eq!(a.digest().unwrap(), b.digest().unwrap());
    }

    #[test]
    fn file_source_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSnapshotSource::new(dir.path().join("absent.json"));
        assert!(matches!(source.load(), Err(AuditError::FileNotFound { .. })));
    }

    #[test]
    fn file_source_reads_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        std::fs::write(&path, SNAPSHOT).unwrap();
        let snapshot = FileSnapshotSource::new(&path).load().unwrap();
        assert_eq!(snapshot.total_supply, Amount::from(300u64));
    }
}
