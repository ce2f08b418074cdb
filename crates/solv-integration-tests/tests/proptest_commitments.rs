//! Property tests over randomly generated liability sets.

use proptest::prelude::*;
use solv_core::{Amount, LiabilityRecord, OwnerId};
use solv_crypto::{build_tree, SumTreeBuilder};

fn liability_set() -> impl Strategy<Value = Vec<LiabilityRecord>> {
    prop::collection::vec(any::<u64>(), 1..24).prop_map(|balances| {
        balances
            .into_iter()
            .enumerate()
            .map(|(i, b)| LiabilityRecord::new(OwnerId::from_u64(i as u64 + 1), Amount::from(b)))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn root_sum_is_exact_total(records in liability_set()) {
        let tree = build_tree(&records).unwrap();
        let expected: Amount = records.iter().map(|r| &r.balance).sum();
        prop_assert_eq!(&tree.root().sum, &expected);
    }

    #[test]
    fn every_leaf_has_a_valid_inclusion_proof(records in liability_set()) {
        let tree = build_tree(&records).unwrap();
        for proof in tree.inclusion_proofs().unwrap() {
            prop_assert!(proof.verify().unwrap());
        }
    }

    #[test]
    fn every_level_halves_rounding_up(records in liability_set()) {
        let tree = build_tree(&records).unwrap();
        for pair in tree.levels().windows(2) {
            prop_assert_eq!(pair[1].len(), pair[0].len().div_ceil(2));
        }
        prop_assert_eq!(tree.levels().last().unwrap().len(), 1);
    }

    #[test]
    fn parallel_build_matches_sequential(records in liability_set(), workers in 2usize..5) {
        let sequential = build_tree(&records).unwrap();
        let parallel = SumTreeBuilder::new()
            .with_workers(workers)
            .with_parallel_threshold(2)
            .build(&records)
            .unwrap();
        prop_assert_eq!(sequential.levels(), parallel.levels());
    }

    #[test]
    fn reversing_keeps_sum(records in liability_set()) {
        let mut reversed = records.clone();
        reversed.reverse();
        let a = build_tree(&records).unwrap();
        let b = build_tree(&reversed).unwrap();
        prop_assert_eq!(&a.root().sum, &b.root().sum);
    }
}
