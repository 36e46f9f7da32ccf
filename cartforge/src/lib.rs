//! # cartforge 🌳
//!
//! A classification random forest built from first principles: CART-style
//! decision trees with Gini impurity, grown over per-feature quantile-binned
//! features, bagged into an ensemble trained in parallel.
//!
//! ## Modules
//!
//! - **core** — shared error types and feature-matrix primitives.
//! - **tree** — the binner, the iterative tree builder, the flat tree predictor
//!   and the bagging [`Forest`].
//!
//! ## External interface
//!
//! This crate's public surface is intentionally three operations: [`fit`],
//! [`predict_one`] and [`predict_many`]. Model persistence, dataset loading
//! and any serving front-end are the caller's responsibility — `Forest` and
//! every type it is built from derive `serde::Serialize`/`Deserialize`, so a
//! caller can round-trip a trained forest through whatever wire format it
//! chooses (JSON, bincode, ...) without this crate prescribing one.

/// Shared error types and feature-matrix primitives.
pub use cartforge_core as core;

/// CART trees, quantile binning and the bagging ensemble.
pub use cartforge_tree as tree;

pub use cartforge_core::{FeatureMatrix, ForestError, ForestResult};
pub use cartforge_tree::Forest;

/// Train a forest of `n_trees` bagged CART trees, each grown to at most
/// `max_depth`, on a feature-major training matrix.
///
/// `x` holds `n_samples * n_features` values laid out feature-major (all
/// values of feature 0, then all of feature 1, ...). `y` holds one label per
/// sample, in `[0, C)` for some class count `C` inferred as `max(y) + 1`.
///
/// Training is deterministic in `seed`: repeated calls with the same
/// arguments, run with any number of worker threads, produce bit-identical
/// trees (see [`Forest::fit`] for the sub-seed derivation that makes this
/// true).
pub fn fit(
    x: &[f32],
    y: &[i32],
    n_samples: usize,
    n_features: usize,
    n_trees: usize,
    max_depth: usize,
    seed: u64,
) -> ForestResult<Forest> {
    let matrix = FeatureMatrix::from_feature_major(x.to_vec(), n_samples, n_features)?;
    Forest::fit(&matrix, y, n_trees, max_depth, seed)
}

/// Predict the class of a single sample, given as `n_features` values in the
/// original (unbinned) feature scale.
pub fn predict_one(forest: &Forest, sample: &[f32]) -> ForestResult<i32> {
    forest.predict_one(sample)
}

/// Predict classes for a batch of `m` samples, laid out sample-major (row `i`
/// is `samples[i * n_features .. (i + 1) * n_features]`).
pub fn predict_many(
    forest: &Forest,
    samples: &[f32],
    m: usize,
    n_features: usize,
) -> ForestResult<Vec<i32>> {
    if n_features != forest.n_features() {
        return Err(ForestError::InvalidShape {
            detail: format!(
                "sample width {} does not match forest's {} features",
                n_features,
                forest.n_features()
            ),
        });
    }
    let sample_matrix =
        cartforge_core::SampleMatrix::from_sample_major(samples.to_vec(), m, n_features)?;
    (0..m)
        .map(|i| forest.predict_one(sample_matrix.row(i)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// A 3-class synthetic "media recommendation" dataset: each sample is
    /// (bitrate_kbps, resolution_height, duration_minutes) and the label is
    /// one of {movie, series, track}, with class-conditional distributions
    /// separated enough that a handful of shallow trees classify it cleanly.
    /// Test-only scaffolding, not a crate feature.
    fn media_quality_dataset(n_per_class: usize, seed: u64) -> (Vec<f32>, Vec<i32>, usize, usize) {
        let n_features = 3;
        let mut rng = StdRng::seed_from_u64(seed);
        let mut rows: Vec<[f32; 3]> = Vec::new();
        let mut y = Vec::new();

        // class 0: "track" — low bitrate, no resolution, short duration.
        for _ in 0..n_per_class {
            rows.push([
                128.0 + rng.gen_range(-16.0..16.0),
                0.0,
                3.0 + rng.gen_range(-1.0..1.0),
            ]);
            y.push(0);
        }
        // class 1: "series" — mid bitrate, 1080p, short episodes.
        for _ in 0..n_per_class {
            rows.push([
                4000.0 + rng.gen_range(-300.0..300.0),
                1080.0,
                25.0 + rng.gen_range(-3.0..3.0),
            ]);
            y.push(1);
        }
        // class 2: "movie" — high bitrate, 4k, long duration.
        for _ in 0..n_per_class {
            rows.push([
                12000.0 + rng.gen_range(-800.0..800.0),
                2160.0,
                110.0 + rng.gen_range(-10.0..10.0),
            ]);
            y.push(2);
        }

        let n_samples = rows.len();
        let mut x = vec![0f32; n_samples * n_features];
        for (i, row) in rows.iter().enumerate() {
            for f in 0..n_features {
                x[f * n_samples + i] = row[f];
            }
        }
        (x, y, n_samples, n_features)
    }

    #[test]
    fn fit_and_predict_round_trip_on_separable_data() {
        let (x, y, n_samples, n_features) = media_quality_dataset(40, 1);
        let forest = fit(&x, &y, n_samples, n_features, 20, 5, 1).unwrap();

        let mut correct = 0;
        for i in 0..n_samples {
            let sample: Vec<f32> = (0..n_features).map(|f| x[f * n_samples + i]).collect();
            if predict_one(&forest, &sample).unwrap() == y[i] {
                correct += 1;
            }
        }
        assert!(correct as f64 / n_samples as f64 >= 0.95);
    }

    #[test]
    fn predict_many_matches_predict_one() {
        let (x, y, n_samples, n_features) = media_quality_dataset(15, 2);
        let forest = fit(&x, &y, n_samples, n_features, 10, 4, 2).unwrap();

        let mut sample_major = vec![0f32; n_samples * n_features];
        for i in 0..n_samples {
            for f in 0..n_features {
                sample_major[i * n_features + f] = x[f * n_samples + i];
            }
        }

        let batch = predict_many(&forest, &sample_major, n_samples, n_features).unwrap();
        for i in 0..n_samples {
            let sample: Vec<f32> = (0..n_features).map(|f| x[f * n_samples + i]).collect();
            assert_eq!(batch[i], predict_one(&forest, &sample).unwrap());
        }
        let _ = y;
    }

    #[test]
    fn predict_many_rejects_mismatched_feature_width() {
        let (x, y, n_samples, n_features) = media_quality_dataset(5, 3);
        let forest = fit(&x, &y, n_samples, n_features, 5, 3, 3).unwrap();
        let bad_samples = vec![0f32; 4];
        let err = predict_many(&forest, &bad_samples, 2, 2).unwrap_err();
        assert!(matches!(err, ForestError::InvalidShape { .. }));
    }

    #[test]
    fn reproducible_across_worker_counts() {
        let (x, y, n_samples, n_features) = media_quality_dataset(30, 1);

        let pool1 = rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build()
            .unwrap();
        let pool4 = rayon::ThreadPoolBuilder::new()
            .num_threads(4)
            .build()
            .unwrap();

        let forest_serial =
            pool1.install(|| fit(&x, &y, n_samples, n_features, 16, 6, 1).unwrap());
        let forest_parallel =
            pool4.install(|| fit(&x, &y, n_samples, n_features, 16, 6, 1).unwrap());

        for i in 0..n_samples {
            let sample: Vec<f32> = (0..n_features).map(|f| x[f * n_samples + i]).collect();
            assert_eq!(
                predict_one(&forest_serial, &sample).unwrap(),
                predict_one(&forest_parallel, &sample).unwrap()
            );
        }
    }

    #[test]
    fn forest_round_trips_through_json() {
        let (x, y, n_samples, n_features) = media_quality_dataset(10, 4);
        let forest = fit(&x, &y, n_samples, n_features, 6, 4, 4).unwrap();

        let encoded = serde_json::to_vec(&forest).unwrap();
        let decoded: Forest = serde_json::from_slice(&encoded).unwrap();

        for i in 0..n_samples {
            let sample: Vec<f32> = (0..n_features).map(|f| x[f * n_samples + i]).collect();
            assert_eq!(
                predict_one(&forest, &sample).unwrap(),
                predict_one(&decoded, &sample).unwrap()
            );
        }
    }

    #[test]
    fn fit_rejects_sample_count_mismatch() {
        let err = fit(&[1.0, 2.0], &[0, 0, 0], 2, 1, 3, 2, 0).unwrap_err();
        assert!(matches!(err, ForestError::InvalidShape { .. }));
    }
}
