// ============================================================
// Layer 4 — Cross-Validation Fold Planner
// ============================================================
// Partitions the corpus sample indices into k folds for
// cross-validation. Each fold holds out one slice of a
// shuffled index permutation as its validation set and trains
// on everything else, so:
//
//   - every sample is validated against exactly once
//   - train and validation sets are disjoint within a fold
//   - folds never share learned state (the trainer re-inits
//     the model per fold)
//
// The shuffle is seeded, not thread_rng: the same corpus size
// and seed must always produce the same partition, so repeated
// runs are comparable.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// One cross-validation fold: disjoint index sets into the
/// corpus dataset. Ephemeral — planned fresh per run, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    pub train:      Vec<usize>,
    pub validation: Vec<usize>,
}

/// Plan `k` folds over `sample_count` indices using a shuffle
/// seeded with `seed`.
///
/// The shuffled permutation is cut into k validation slices of
/// near-equal size (the first `sample_count % k` slices get one
/// extra element). Callers must ensure `2 <= k <= sample_count`.
pub fn plan_folds(sample_count: usize, k: usize, seed: u64) -> Vec<Fold> {
    debug_assert!(k >= 2 && k <= sample_count);

    let mut indices: Vec<usize> = (0..sample_count).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let base = sample_count / k;
    let extra = sample_count % k;

    let mut folds = Vec::with_capacity(k);
    let mut cursor = 0usize;

    for fold_index in 0..k {
        let size = base + usize::from(fold_index < extra);
        let validation: Vec<usize> = indices[cursor..cursor + size].to_vec();
        let train: Vec<usize> = indices[..cursor]
            .iter()
            .chain(indices[cursor + size..].iter())
            .copied()
            .collect();
        cursor += size;
        folds.push(Fold { train, validation });
    }

    folds
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_same_seed_same_partition() {
        let a = plan_folds(100, 5, 42);
        let b = plan_folds(100, 5, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seed_different_partition() {
        let a = plan_folds(100, 5, 42);
        let b = plan_folds(100, 5, 43);
        assert_ne!(a, b);
    }

    #[test]
    fn test_validation_slices_partition_the_corpus() {
        let folds = plan_folds(23, 5, 7);
        assert_eq!(folds.len(), 5);

        let mut seen = BTreeSet::new();
        for fold in &folds {
            for &i in &fold.validation {
                // no index validated twice across folds
                assert!(seen.insert(i));
            }
        }
        assert_eq!(seen, (0..23).collect::<BTreeSet<_>>());
    }

    #[test]
    fn test_train_and_validation_are_disjoint_and_complete() {
        for fold in plan_folds(20, 4, 1) {
            let train: BTreeSet<_> = fold.train.iter().copied().collect();
            let val: BTreeSet<_> = fold.validation.iter().copied().collect();
            assert!(train.is_disjoint(&val));
            assert_eq!(train.len() + val.len(), 20);
        }
    }

    #[test]
    fn test_uneven_sizes_spread_the_remainder() {
        let folds = plan_folds(11, 3, 9);
        let sizes: Vec<usize> = folds.iter().map(|f| f.validation.len()).collect();
        assert_eq!(sizes, vec![4, 4, 3]);
    }
}
