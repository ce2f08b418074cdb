//! # Inclusion-and-Sum Proofs
//!
//! Lets an owner check that their balance is committed under the published
//! root without seeing anyone else's balance. The proof for leaf `i` is the
//! ordered list of sibling `(commitment, sum)` pairs from the leaf to the
//! root. When the leaf's ancestor is the last node of an odd level, the
//! sibling is the zero node `{ 0, 0 }`.
//!
//! Extraction is a read-only walk over the retained levels of a built
//! [`LiabilityTree`]; verification recomputes the path bottom-up.

use serde::{Deserialize, Serialize};
use solv_core::{Amount, FieldElement, LiabilityRecord};

use crate::error::TreeError;
use crate::poseidon::FieldHasher;
use crate::sum_tree::{leaf_with, parent_with, LiabilityTree, TreeNode};

/// Side of the sibling relative to the node on the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Sibling is the left child; the path node is on the right.
    Left,
    /// Sibling is the right child; the path node is on the left.
    Right,
}

impl Side {
    /// String form used in exported proofs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sibling on the authentication path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    /// Which side the sibling sits on.
    pub side: Side,
    /// Sibling commitment.
    pub commitment: FieldElement,
    /// Sibling subtree sum.
    pub sum: Amount,
}

/// Proof that `record` is leaf `leaf_index` of the tree with root `root`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InclusionProof {
    /// Position of the leaf.
    pub leaf_index: usize,
    /// The committed record.
    pub record: LiabilityRecord,
    /// Siblings from the leaf level upwards.
    pub path: Vec<PathStep>,
    /// The root the path must reproduce.
    pub root: TreeNode,
}

impl LiabilityTree {
    /// Extract the inclusion proof for leaf `index`.
    ///
    /// # Errors
    ///
    /// [`TreeError::LeafOutOfRange`] when `index >= leaf_count()`.
    pub fn inclusion_proof(&self, index: usize) -> Result<InclusionProof, TreeError> {
        let record = self
            .records()
            .get(index)
            .ok_or(TreeError::LeafOutOfRange {
                index,
                leaves: self.leaf_count(),
            })?
            .clone();

        let levels = self.levels();
        let mut path = Vec::with_capacity(levels.len().saturating_sub(1));
        let mut pos = index;
        for level in &levels[..levels.len() - 1] {
            let sibling_pos = pos ^ 1;
            let sibling = level.get(sibling_pos).cloned().unwrap_or_else(TreeNode::zero);
            let side = if sibling_pos < pos {
                Side::Left
            } else {
                Side::Right
            };
            path.push(PathStep {
                side,
                commitment: sibling.commitment,
                sum: sibling.sum,
            });
            pos /= 2;
        }

        Ok(InclusionProof {
            leaf_index: index,
            record,
            path,
            root: self.root().clone(),
        })
    }

    /// Inclusion proofs for every leaf, in leaf order.
    pub fn inclusion_proofs(&self) -> Result<Vec<InclusionProof>, TreeError> {
        (0..self.leaf_count())
            .map(|i| self.inclusion_proof(i))
            .collect()
    }
}

impl InclusionProof {
    /// Recompute the root from the record and path.
    ///
    /// Returns `Ok(false)` when the path does not reproduce `root` or when a
    /// step's side disagrees with the bits of `leaf_index`.
    ///
    /// # Errors
    ///
    /// Encoding errors if the record or a sibling sum does not fit the field.
    pub fn verify(&self) -> Result<bool, TreeError> {
        let mut hasher = FieldHasher::new()?;
        self.verify_with(&mut hasher)
    }

    /// [`verify`](Self::verify) with a caller-supplied hasher.
    pub fn verify_with(&self, hasher: &mut FieldHasher) -> Result<bool, TreeError> {
        if self.path.len() >= usize::BITS as usize {
            return Ok(false);
        }
        if self.leaf_index >> self.path.len() != 0 {
            return Ok(false);
        }

        let mut current = leaf_with(hasher, &self.record)?;
        for (height, step) in self.path.iter().enumerate() {
            let expected = if (self.leaf_index >> height) & 1 == 0 {
                Side::Right
            } else {
                Side::Left
            };
            if step.side != expected {
                return Ok(false);
            }
            let sibling = TreeNode {
                commitment: step.commitment,
                sum: step.sum.clone(),
            };
            current = match step.side {
                Side::Left => parent_with(hasher, &sibling, &current)?,
                Side::Right => parent_with(hasher, &current, &sibling)?,
            };
        }
        Ok(current == self.root)
    }
}
