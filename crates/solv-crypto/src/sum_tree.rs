//! # Liability Sum-Tree
//!
//! Commits an ordered liability snapshot into a single `(commitment, sum)`
//! root and checks that root against the on-chain total supply.
//!
//! ## Construction
//!
//! ```text
//! leaf   = { H2(owner, balance),                                balance      }
//! parent = { H4(left.commitment, left.sum, right.commitment, right.sum),
//!                                                     left.sum + right.sum }
//! zero   = { 0, 0 }   // right partner of the last node of an odd level
//! ```
//!
//! Levels are folded left-to-right, pair `i` combining nodes `2i` and
//! `2i + 1`, until one node remains. The zero node participates in exactly
//! one parent computation and is never stored in a level. Every level is
//! retained so inclusion proofs can be read off the tree afterwards.
//!
//! ## Concurrency
//!
//! Leaf hashing and each level's pair folding are independent per element.
//! [`SumTreeBuilder`] can split a level across scoped worker threads; the
//! chunks are re-joined in order, so the result is identical to the
//! sequential build.

use serde::{Deserialize, Serialize};
use solv_core::{Amount, AuditAnchor, FieldElement, LiabilityRecord};

use crate::error::TreeError;
use crate::poseidon::FieldHasher;

/// A node of the sum-tree: a Poseidon commitment plus its subtree balance sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Poseidon commitment, serialized as a decimal string.
    pub commitment: FieldElement,
    /// Exact sum of the balances below this node.
    pub sum: Amount,
}

impl TreeNode {
    /// The padding node `{ commitment: 0, sum: 0 }`.
    pub fn zero() -> Self {
        Self {
            commitment: FieldElement::zero(),
            sum: Amount::zero(),
        }
    }
}

/// Build the leaf node for one record: `{ H(owner, balance), balance }`.
///
/// # Errors
///
/// [`TreeError::EncodingOverflow`] if the owner or balance does not fit the field.
pub fn build_leaf(record: &LiabilityRecord) -> Result<TreeNode, TreeError> {
    let mut hasher = FieldHasher::new()?;
    leaf_with(&mut hasher, record)
}

pub(crate) fn leaf_with(
    hasher: &mut FieldHasher,
    record: &LiabilityRecord,
) -> Result<TreeNode, TreeError> {
    let [owner, balance] = record.field_inputs()?;
    Ok(TreeNode {
        commitment: hasher.hash2(owner, balance)?,
        sum: record.balance.clone(),
    })
}

/// Combine two children: `{ H(lc, ls, rc, rs), ls + rs }`.
pub(crate) fn parent_with(
    hasher: &mut FieldHasher,
    left: &TreeNode,
    right: &TreeNode,
) -> Result<TreeNode, TreeError> {
    let commitment = hasher.hash4(
        left.commitment,
        left.sum.to_field("subtree sum")?,
        right.commitment,
        right.sum.to_field("subtree sum")?,
    )?;
    Ok(TreeNode {
        commitment,
        sum: &left.sum + &right.sum,
    })
}

/// A built liability sum-tree. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiabilityTree {
    records: Vec<LiabilityRecord>,
    /// `levels[0]` are the leaves; the last level holds only the root.
    levels: Vec<Vec<TreeNode>>,
}

impl LiabilityTree {
    /// The root node.
    pub fn root(&self) -> &TreeNode {
        // Construction guarantees at least one level with exactly one node
        // at the top.
        &self.levels[self.levels.len() - 1][0]
    }

    /// All levels, leaves first.
    pub fn levels(&self) -> &[Vec<TreeNode>] {
        &self.levels
    }

    /// The leaf level.
    pub fn leaves(&self) -> &[TreeNode] {
        &self.levels[0]
    }

    /// The records the tree was built from, in leaf order.
    pub fn records(&self) -> &[LiabilityRecord] {
        &self.records
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.records.len()
    }

    /// Number of levels, including the leaf level and the root level.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Indices of the levels whose last node was paired with the zero node.
    pub fn padded_levels(&self) -> Vec<usize> {
        self.levels
            .iter()
            .enumerate()
            .filter(|(_, level)| level.len() > 1 && level.len() % 2 == 1)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Builds sum-trees, optionally spreading each level over worker threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SumTreeBuilder {
    workers: usize,
    parallel_threshold: usize,
}

impl Default for SumTreeBuilder {
    fn default() -> Self {
        Self {
            workers: 1,
            parallel_threshold: 1024,
        }
    }
}

impl SumTreeBuilder {
    /// A sequential builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use up to `workers` threads per level (`0` is treated as `1`).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Only split levels with at least this many elements.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold.max(1);
        self
    }

    /// Build the tree for an ordered, non-empty record sequence.
    ///
    /// # Errors
    ///
    /// - [`TreeError::EmptyLiabilitySet`] for an empty sequence.
    /// - [`TreeError::EncodingOverflow`] if any owner, balance, subtree sum,
    ///   or the root sum does not fit the field. The root sum is published
    ///   and becomes the prover's `totalIssuance`, so it is range-checked
    ///   even though no parent hashes it.
    pub fn build(&self, records: &[LiabilityRecord]) -> Result<LiabilityTree, TreeError> {
        if records.is_empty() {
            return Err(TreeError::EmptyLiabilitySet);
        }

        let leaves = self.map_ordered(records, |hasher, record| leaf_with(hasher, record))?;
        let mut levels = vec![leaves];

        let zero = TreeNode::zero();
        while levels[levels.len() - 1].len() > 1 {
            let current = &levels[levels.len() - 1];
            let pairs: Vec<&[TreeNode]> = current.chunks(2).collect();
            let next = self.map_ordered(&pairs, |hasher, pair| {
                let right = pair.get(1).unwrap_or(&zero);
                parent_with(hasher, &pair[0], right)
            })?;
            levels.push(next);
        }
        levels[levels.len() - 1][0].sum.to_field("root sum")?;

        Ok(LiabilityTree {
            records: records.to_vec(),
            levels,
        })
    }

    /// Apply `f` to every item, preserving order. Splits into contiguous
    /// chunks across scoped threads when the builder is configured for it.
    fn map_ordered<T, F>(&self, items: &[T], f: F) -> Result<Vec<TreeNode>, TreeError>
    where
        T: Sync,
        F: Fn(&mut FieldHasher, &T) -> Result<TreeNode, TreeError> + Sync,
    {
        if self.workers <= 1 || items.len() < self.parallel_threshold {
            let mut hasher = FieldHasher::new()?;
            return items.iter().map(|item| f(&mut hasher, item)).collect();
        }

        let chunk_size = items.len().div_ceil(self.workers);
        std::thread::scope(|scope| -> Result<Vec<TreeNode>, TreeError> {
            let handles: Vec<_> = items
                .chunks(chunk_size)
                .map(|chunk| {
                    let f = &f;
                    scope.spawn(move || -> Result<Vec<TreeNode>, TreeError> {
                        let mut hasher = FieldHasher::new()?;
                        chunk.iter().map(|item| f(&mut hasher, item)).collect()
                    })
                })
                .collect();

            let mut out = Vec::with_capacity(items.len());
            for handle in handles {
                let part = handle
                    .join()
                    .map_err(|_| TreeError::Worker("worker thread panicked".into()))??;
                out.extend(part);
            }
            Ok(out)
        })
    }
}

/// Build the tree sequentially. See [`SumTreeBuilder::build`].
pub fn build_tree(records: &[LiabilityRecord]) -> Result<LiabilityTree, TreeError> {
    SumTreeBuilder::new().build(records)
}

/// Check the root sum against the anchor's total supply.
///
/// # Errors
///
/// [`TreeError::SupplyMismatch`] unless `root.sum == anchor.total_supply`
/// exactly. The caller must abort the cycle on this error.
pub fn verify_against_anchor(root: &TreeNode, anchor: &AuditAnchor) -> Result<(), TreeError> {
    if root.sum != anchor.total_supply {
        return Err(TreeError::SupplyMismatch {
            tree_sum: root.sum.clone(),
            chain_supply: anchor.total_supply.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use solv_core::OwnerId;

    fn rec(owner: u64, balance: u64) -> LiabilityRecord {
        LiabilityRecord::new(OwnerId::from_u64(owner), Amount::from(balance))
    }

    fn h2(a: u64, b: u64) -> FieldElement {
        FieldHasher::new()
            .unwrap()
            .hash2(FieldElement::from_u64(a), FieldElement::from_u64(b))
            .unwrap()
    }

    #[test]
    fn single_record_is_its_own_root() {
        let tree = build_tree(&[rec(5, 100)]).unwrap();
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.root().sum, Amount::from(100u64));
        assert_eq!(tree.root().commitment, h2(5, 100));
        assert!(tree.padded_levels().is_empty());
    }

    #[test]
    fn build_leaf_matches_tree_leaf() {
        let leaf = build_leaf(&rec(9, 33)).unwrap();
        let tree = build_tree(&[rec(9, 33), rec(10, 1)]).unwrap();
        assert_eq!(&tree.leaves()[0], &leaf);
    }

    #[test]
    fn two_records_hash_children_in_order() {
        let tree = build_tree(&[rec(1, 10), rec(2, 20)]).unwrap();
        let mut h = FieldHasher::new().unwrap();
        let expected = h
            .hash4(
                h2(1, 10),
                FieldElement::from_u64(10),
                h2(2, 20),
                FieldElement::from_u64(20),
            )
            .unwrap();
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.root().commitment, expected);
        assert_eq!(tree.root().sum, Amount::from(30u64));
    }

    #[test]
    fn odd_level_pads_with_zero_node() {
        let tree = build_tree(&[rec(1, 10), rec(2, 20), rec(3, 30)]).unwrap();
        assert_eq!(tree.padded_levels(), vec![0]);
        assert_eq!(tree.levels()[1].len(), 2);

        let mut h = FieldHasher::new().unwrap();
        let padded = h
            .hash4(
                h2(3, 30),
                FieldElement::from_u64(30),
                FieldElement::zero(),
                FieldElement::zero(),
            )
            .unwrap();
        assert_eq!(tree.levels()[1][1].commitment, padded);
        assert_eq!(tree.levels()[1][1].sum, Amount::from(30u64));
        assert_eq!(tree.root().sum, Amount::from(60u64));
    }

    #[test]
    fn padding_differs_from_a_real_fourth_record() {
        let three = build_tree(&[rec(1, 10), rec(2, 20), rec(3, 30)]).unwrap();
        let four = build_tree(&[rec(1, 10), rec(2, 20), rec(3, 30), rec(0, 7)]).unwrap();
        assert_ne!(three.root().commitment, four.root().commitment);
        assert_ne!(three.root().sum, four.root().sum);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(build_tree(&[]), Err(TreeError::EmptyLiabilitySet));
    }

    #[test]
    fn anchor_match_and_mismatch() {
        let tree = build_tree(&[rec(1, 40), rec(2, 60)]).unwrap();
        assert!(verify_against_anchor(tree.root(), &AuditAnchor::new(Amount::from(100u64), 1)).is_ok());

        let err =
            verify_against_anchor(tree.root(), &AuditAnchor::new(Amount::from(101u64), 1)).unwrap_err();
        assert_eq!(
            err,
            TreeError::SupplyMismatch {
                tree_sum: Amount::from(100u64),
                chain_supply: Amount::from(101u64),
            }
        );
    }

    #[test]
    fn permutation_changes_commitment_not_sum() {
        let a = build_tree(&[rec(1, 10), rec(2, 20), rec(3, 30)]).unwrap();
        let b = build_tree(&[rec(2, 20), rec(1, 10), rec(3, 30)]).unwrap();
        assert_eq!(a.root().sum, b.root().sum);
        assert_ne!(a.root().commitment, b.root().commitment);
    }

    #[test]
    fn oversized_balance_is_fatal() {
        let huge = Amount::new(solv_core::field::field_modulus().clone());
        let records = vec![rec(1, 1), LiabilityRecord::new(OwnerId::from_u64(2), huge)];
        assert!(matches!(
            build_tree(&records),
            Err(TreeError::EncodingOverflow { what: "balance", .. })
        ));
    }

    #[test]
    fn subtree_sum_overflow_is_fatal() {
        // Each balance fits the field but the first pair sums to exactly r,
        // which must not be reduced when it feeds the next parent hash.
        let max = solv_core::field::field_modulus() - num_bigint::BigUint::from(1u8);
        let records = vec![
            LiabilityRecord::new(OwnerId::from_u64(1), Amount::new(max)),
            rec(2, 1),
            rec(3, 0),
            rec(4, 0),
        ];
        assert!(matches!(
            build_tree(&records),
            Err(TreeError::EncodingOverflow { what: "subtree sum", .. })
        ));
    }

    #[test]
    fn root_sum_overflow_is_fatal() {
        let max = solv_core::field::field_modulus() - num_bigint::BigUint::from(1u8);
        let records = vec![
            LiabilityRecord::new(OwnerId::from_u64(1), Amount::new(max.clone())),
            LiabilityRecord::new(OwnerId::from_u64(2), Amount::new(max)),
        ];
        assert!(matches!(
            build_tree(&records),
            Err(TreeError::EncodingOverflow { what: "root sum", .. })
        ));
    }

    #[test]
    fn root_sum_just_below_modulus_builds() {
        let max = solv_core::field::field_modulus() - num_bigint::BigUint::from(1u8);
        let records = vec![
            LiabilityRecord::new(OwnerId::from_u64(1), Amount::new(max.clone())),
            rec(2, 0),
        ];
        let tree = build_tree(&records).unwrap();
        assert_eq!(tree.root().sum, Amount::new(max));
    }

    #[test]
    fn parallel_build_matches_sequential() {
        let records: Vec<_> = (0..37).map(|i| rec(i + 1, i * 3 + 1)).collect();
        let sequential = build_tree(&records).unwrap();
        let parallel = SumTreeBuilder::new()
            .with_workers(4)
            .with_parallel_threshold(2)
            .build(&records)
            .unwrap();
        assert_eq!(sequential, parallel);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use solv_core::OwnerId;

    fn records(balances: &[u64]) -> Vec<LiabilityRecord> {
        balances
            .iter()
            .enumerate()
            .map(|(i, b)| LiabilityRecord::new(OwnerId::from_u64(i as u64 + 1), Amount::from(*b)))
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        /// Root sum equals the exact sum of balances for any length.
        #[test]
        fn root_sum_is_exact(balances in prop::collection::vec(any::<u64>(), 1..20)) {
            let tree = build_tree(&records(&balances)).unwrap();
            let expected: Amount = balances.iter().map(|b| Amount::from(*b)).sum();
            prop_assert_eq!(&tree.root().sum, &expected);
        }

        /// Building twice yields the same root.
        #[test]
        fn build_is_deterministic(balances in prop::collection::vec(0u64..1_000_000, 1..12)) {
            let input = records(&balances);
            let a = build_tree(&input).unwrap();
            let b = build_tree(&input).unwrap();
            prop_assert_eq!(a.root(), b.root());
        }

        /// Every internal node's sum is the sum of its children.
        #[test]
        fn internal_sums_add_up(balances in prop::collection::vec(0u64..1_000_000, 2..16)) {
            let tree = build_tree(&records(&balances)).unwrap();
            for window in tree.levels().windows(2) {
                let (child, parent) = (&window[0], &window[1]);
                for (i, node) in parent.iter().enumerate() {
                    let left = &child[2 * i].sum;
                    let right = child.get(2 * i + 1).map(|n| n.sum.clone()).unwrap_or_else(Amount::zero);
                    prop_assert_eq!(&node.sum, &(left + &right));
                }
            }
        }
    }
}
