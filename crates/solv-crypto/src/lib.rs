//! # solv-crypto — Liability Commitment Kernel
//!
//! Provides the cryptographic building blocks of a solvency audit:
//!
//! - **Poseidon** hashing over the BN254 scalar field, parameter-compatible
//!   with circomlib so commitments match the external proving circuits.
//! - **Liability sum-tree**: a binary Merkle tree whose nodes carry both a
//!   Poseidon commitment and the exact balance sum of their subtree, with
//!   the anchor check against on-chain total supply.
//! - **Inclusion proofs**: the sibling `(commitment, sum)` path from any
//!   leaf to the root, extracted read-only from the retained levels.
//!
//! ## Crate Policy
//!
//! - Depends only on `solv-core` internally.
//! - Pure computation: no I/O, no global state. A built tree is immutable.
//! - No silent modular reduction of inputs; see `solv_core::FieldElement`.

pub mod error;
pub mod inclusion;
pub mod poseidon;
pub mod sum_tree;

pub use error::TreeError;
pub use inclusion::{InclusionProof, PathStep, Side};
pub use poseidon::{poseidon_hash, FieldHasher};
pub use sum_tree::{
    build_leaf, build_tree, verify_against_anchor, LiabilityTree, SumTreeBuilder, TreeNode,
};
