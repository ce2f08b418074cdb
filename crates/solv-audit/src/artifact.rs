//! # Root-Commitment Record
//!
//! The published outcome of tree construction:
//!
//! ```json
//! { "rootHash": "<decimal>", "rootSum": "<decimal>", "snapshotBlock": 42 }
//! ```
//!
//! On-chain, `rootHash` is passed as `bytes32`: big-endian, `0x` plus 64
//! zero-padded hex digits. See [`RootCommitment::root_hash_hex`].

use serde::{Deserialize, Serialize};
use solv_core::{Amount, FieldElement};
use solv_crypto::TreeNode;

/// Root hash, root sum and snapshot height of a built tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootCommitment {
    pub root_hash: FieldElement,
    pub root_sum: Amount,
    pub snapshot_block: u64,
}

impl RootCommitment {
    pub fn new(root: &TreeNode, snapshot_block: u64) -> Self {
        Self {
            root_hash: root.commitment,
            root_sum: root.sum.clone(),
            snapshot_block,
        }
    }

    /// `rootHash` as a `bytes32` literal.
    pub fn root_hash_hex(&self) -> String {
        self.root_hash.to_bytes32_hex()
    }
}
