use cartforge_core::FeatureMatrix;
use serde::{Deserialize, Serialize};

/// Bin indices fit in a `u8`, so at most 256 bins per feature.
pub const MAX_BINS: usize = 256;

const EPSILON: f32 = 1e-5;

/// Per-feature quantile edges, flattened as `n_features * (MAX_BINS + 1)`
/// with only the first `n_bins[f] + 1` entries of feature `f`'s row valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeTable {
    edges: Vec<f32>,
    n_bins: Vec<usize>,
    n_features: usize,
}

impl EdgeTable {
    /// The non-decreasing edge sequence for `feature` — `n_bins(feature) + 1` entries.
    pub fn edges_for(&self, feature: usize) -> &[f32] {
        let n = self.n_bins[feature];
        let start = feature * (MAX_BINS + 1);
        &self.edges[start..start + n + 1]
    }

    /// Left edge of `bin` for `feature`, in the original feature scale.
    pub fn edge(&self, feature: usize, bin: usize) -> f32 {
        self.edges[feature * (MAX_BINS + 1) + bin]
    }

    pub fn n_bins(&self, feature: usize) -> usize {
        self.n_bins[feature]
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

/// A discretized feature matrix: one `u8` bin index per (sample, feature),
/// feature-major like the `FeatureMatrix` it was built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinnedMatrix {
    data: Vec<u8>,
    n_samples: usize,
    n_features: usize,
}

impl BinnedMatrix {
    #[inline]
    pub fn get(&self, sample: usize, feature: usize) -> u8 {
        self.data[feature * self.n_samples + sample]
    }

    #[inline]
    pub fn column(&self, feature: usize) -> &[u8] {
        let start = feature * self.n_samples;
        &self.data[start..start + self.n_samples]
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

/// The left index of the first edge strictly greater than `value`, i.e. the
/// number of edges `<= value`. `edges` must be non-decreasing.
fn upper_bound(edges: &[f32], value: f32) -> usize {
    edges.partition_point(|&e| e <= value)
}

/// Discretize every feature of `x` into up to [`MAX_BINS`] quantile bins.
///
/// For each feature: sort its distinct values, place `n_f = min(k, MAX_BINS)`
/// edges at index-quantiles of the distinct sequence, and assign every
/// sample's value to `upper_bound(edges, value) - 1`. A constant or empty
/// column collapses to a single bin (`n_f = 1`), under which no split will
/// ever improve on the parent's Gini — the tree builder turns such a node
/// into a leaf rather than failing.
pub fn discretize(x: &FeatureMatrix) -> (BinnedMatrix, EdgeTable) {
    let n_samples = x.n_samples();
    let n_features = x.n_features();

    let mut binned = vec![0u8; n_samples * n_features];
    let mut edges = vec![0f32; n_features * (MAX_BINS + 1)];
    let mut n_bins = vec![1usize; n_features];

    for f in 0..n_features {
        let column = x.column(f);

        let mut distinct: Vec<f32> = column.to_vec();
        distinct.sort_by(|a, b| a.partial_cmp(b).unwrap());
        distinct.dedup();

        let k = distinct.len().max(1);
        let n_f = k.min(MAX_BINS);
        n_bins[f] = n_f;

        let edge_row = &mut edges[f * (MAX_BINS + 1)..f * (MAX_BINS + 1) + n_f + 1];
        if distinct.is_empty() {
            edge_row[0] = 0.0;
            edge_row[1] = EPSILON;
        } else {
            for (b, edge) in edge_row.iter_mut().take(n_f).enumerate() {
                *edge = distinct[b * k / n_f];
            }
            edge_row[n_f] = distinct[k - 1] + EPSILON;
        }

        let edge_slice = &edges[f * (MAX_BINS + 1)..f * (MAX_BINS + 1) + n_f + 1];
        for (i, &v) in column.iter().enumerate() {
            let bin = upper_bound(edge_slice, v).saturating_sub(1).min(n_f - 1);
            binned[f * n_samples + i] = bin as u8;
        }
    }

    (
        BinnedMatrix {
            data: binned,
            n_samples,
            n_features,
        },
        EdgeTable {
            edges,
            n_bins,
            n_features,
        },
    )
}
