//! # Poseidon over BN254
//!
//! Wraps `light-poseidon`'s circom parameter sets. Three arities are used:
//!
//! - 1 input: the reserve attestation message `H(reserveBalance)`.
//! - 2 inputs: leaf commitment `H(owner, balance)`.
//! - 4 inputs: node commitment `H(leftCommitment, leftSum, rightCommitment, rightSum)`.
//!
//! The outputs equal circomlibjs `poseidon([...])` for the same inputs, which
//! is what the external circuits recompute.

use ark_bn254::Fr;
use light_poseidon::{Poseidon, PoseidonHasher};
use solv_core::FieldElement;

use crate::error::TreeError;

/// A reusable Poseidon hasher holding the three parameter sets.
///
/// Hashing takes `&mut self`; give each worker thread its own instance.
pub struct FieldHasher {
    single: Poseidon<Fr>,
    pair: Poseidon<Fr>,
    quad: Poseidon<Fr>,
}

impl FieldHasher {
    /// Load the circom parameters for 1, 2 and 4 inputs.
    pub fn new() -> Result<Self, TreeError> {
        Ok(Self {
            single: circom(1)?,
            pair: circom(2)?,
            quad: circom(4)?,
        })
    }

    /// `H(value)`.
    pub fn hash1(&mut self, value: FieldElement) -> Result<FieldElement, TreeError> {
        run(&mut self.single, &[value.inner()])
    }

    /// `H(a, b)`.
    pub fn hash2(&mut self, a: FieldElement, b: FieldElement) -> Result<FieldElement, TreeError> {
        run(&mut self.pair, &[a.inner(), b.inner()])
    }

    /// `H(a, b, c, d)`.
    pub fn hash4(
        &mut self,
        a: FieldElement,
        b: FieldElement,
        c: FieldElement,
        d: FieldElement,
    ) -> Result<FieldElement, TreeError> {
        run(&mut self.quad, &[a.inner(), b.inner(), c.inner(), d.inner()])
    }
}

impl std::fmt::Debug for FieldHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FieldHasher { arities: [1, 2, 4] }")
    }
}

/// One-shot Poseidon hash of 1 to 12 inputs.
///
/// Loads the parameters on every call; prefer [`FieldHasher`] in loops.
pub fn poseidon_hash(inputs: &[FieldElement]) -> Result<FieldElement, TreeError> {
    if inputs.is_empty() {
        return Err(TreeError::Hash("poseidon requires at least one input".into()));
    }
    let mut hasher = circom(inputs.len())?;
    let frs: Vec<Fr> = inputs.iter().map(FieldElement::inner).collect();
    run(&mut hasher, &frs)
}

fn circom(arity: usize) -> Result<Poseidon<Fr>, TreeError> {
    Poseidon::<Fr>::new_circom(arity).map_err(|e| TreeError::Hash(e.to_string()))
}

fn run(hasher: &mut Poseidon<Fr>, inputs: &[Fr]) -> Result<FieldElement, TreeError> {
    hasher
        .hash(inputs)
        .map(FieldElement::from_inner)
        .map_err(|e| TreeError::Hash(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_circomlib_vector_for_one_two() {
        let mut h = FieldHasher::new().unwrap();
        let out = h
            .hash2(FieldElement::from_u64(1), FieldElement::from_u64(2))
            .unwrap();
        assert_eq!(
            out.to_decimal(),
            "7853200120776062878684798364095072458815029376092732009249414926327459813530"
        );
    }

    #[test]
    fn one_shot_agrees_with_reusable_hasher() {
        let mut h = FieldHasher::new().unwrap();
        let inputs = [
            FieldElement::from_u64(3),
            FieldElement::from_u64(4),
            FieldElement::from_u64(5),
            FieldElement::from_u64(6),
        ];
        let a = h.hash4(inputs[0], inputs[1], inputs[2], inputs[3]).unwrap();
        let b = poseidon_hash(&inputs).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn argument_order_matters() {
        let mut h = FieldHasher::new().unwrap();
        let ab = h
            .hash2(FieldElement::from_u64(5), FieldElement::from_u64(100))
            .unwrap();
        let ba = h
            .hash2(FieldElement::from_u64(100), FieldElement::from_u64(5))
            .unwrap();
        assert_ne!(ab, ba);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(poseidon_hash(&[]), Err(TreeError::Hash(_))));
    }
}
