use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use cartforge_core::{FeatureMatrix, ForestError, ForestResult};

use crate::binner::discretize;
use crate::builder::build_tree;
use crate::impurity::{bootstrap, majority_label};
use crate::tree::FlatTree;

/// An ordered ensemble of trees trained by bagging. All trees share the same
/// class cardinality; `predict` tallies one vote per tree and returns the
/// argmax, ties broken toward the lowest class index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forest {
    trees: Vec<FlatTree>,
    n_features: usize,
    n_classes: usize,
}

impl Forest {
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn trees(&self) -> &[FlatTree] {
        &self.trees
    }

    /// Train `n_trees` bagged trees of depth at most `max_depth` on `(x, y)`.
    ///
    /// `x` is discretized once, up front, and shared read-only across every
    /// tree; each tree then draws its own bootstrap sample over the shared
    /// binned matrix (never a physical per-tree copy) and trains independently.
    ///
    /// Per-tree sub-seeds are drawn from a single master rng *sequentially*,
    /// before any parallel work starts, so that the sequence of bootstrap
    /// samples for trees `0..n_trees` is fixed by `seed` alone — training with
    /// one worker or with rayon's full thread pool produces bit-identical trees.
    pub fn fit(
        x: &FeatureMatrix,
        y: &[i32],
        n_trees: usize,
        max_depth: usize,
        seed: u64,
    ) -> ForestResult<Forest> {
        let n_samples = x.n_samples();
        let n_features = x.n_features();

        if y.len() != n_samples {
            return Err(ForestError::InvalidShape {
                detail: format!(
                    "label count {} does not match sample count {}",
                    y.len(),
                    n_samples
                ),
            });
        }

        let max_label = y.iter().copied().max().unwrap_or(-1);
        let n_classes = (max_label + 1).max(1) as usize;
        if let Some(&label) = y.iter().find(|&&label| label < 0) {
            return Err(ForestError::InvalidLabel { label, n_classes });
        }

        let (binned, edges) = discretize(x);

        let mut master_rng = StdRng::seed_from_u64(seed);
        let tree_seeds: Vec<u64> = (0..n_trees).map(|_| master_rng.gen()).collect();

        let trees: Vec<FlatTree> = tree_seeds
            .into_par_iter()
            .map(|tree_seed| -> ForestResult<FlatTree> {
                let mut rng = StdRng::seed_from_u64(tree_seed);
                let boot = bootstrap(n_samples, &mut rng);
                build_tree(
                    &binned,
                    &edges,
                    y,
                    n_classes,
                    n_features,
                    max_depth,
                    boot,
                    &mut rng,
                )
            })
            .collect::<ForestResult<Vec<FlatTree>>>()?;

        Ok(Forest {
            trees,
            n_features,
            n_classes,
        })
    }

    /// Predict the class of a single sample, given in the original (unbinned)
    /// feature scale, by running every tree and taking the majority vote.
    pub fn predict_one(&self, sample: &[f32]) -> ForestResult<i32> {
        if sample.len() != self.n_features {
            return Err(ForestError::InvalidShape {
                detail: format!(
                    "sample has {} features, forest expects {}",
                    sample.len(),
                    self.n_features
                ),
            });
        }
        for (feature, &v) in sample.iter().enumerate() {
            if !v.is_finite() {
                return Err(ForestError::NonFiniteValue { sample: 0, feature });
            }
        }

        let mut votes = vec![0u32; self.n_classes];
        for tree in &self.trees {
            let label = tree.predict(sample) as usize;
            votes[label] += 1;
        }
        Ok(majority_label(&votes))
    }

    /// Predict classes for a batch of sample-major rows.
    pub fn predict_many(&self, samples: &[Vec<f32>]) -> ForestResult<Vec<i32>> {
        samples.iter().map(|s| self.predict_one(s)).collect()
    }
}
