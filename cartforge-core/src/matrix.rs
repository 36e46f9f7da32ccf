use serde::{Deserialize, Serialize};

use crate::error::{ForestError, ForestResult};

/// A training feature matrix, stored **feature-major**: all S values of
/// feature `f` are contiguous, at `data[f * n_samples .. (f + 1) * n_samples]`.
///
/// This is the layout the binner and the split-search sweep want: scanning a
/// single feature column across all samples is a contiguous read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureMatrix {
    data: Vec<f32>,
    n_samples: usize,
    n_features: usize,
}

impl FeatureMatrix {
    /// Build from feature-major data, validating shape and finiteness.
    pub fn from_feature_major(
        data: Vec<f32>,
        n_samples: usize,
        n_features: usize,
    ) -> ForestResult<Self> {
        if n_features == 0 {
            return Err(ForestError::InvalidShape {
                detail: "feature count must be nonzero".to_string(),
            });
        }
        if data.len() != n_samples * n_features {
            return Err(ForestError::InvalidShape {
                detail: format!(
                    "expected {} values ({} samples x {} features), got {}",
                    n_samples * n_features,
                    n_samples,
                    n_features,
                    data.len()
                ),
            });
        }
        for (i, &v) in data.iter().enumerate() {
            if !v.is_finite() {
                let feature = i / n_samples;
                let sample = i % n_samples;
                return Err(ForestError::NonFiniteValue { sample, feature });
            }
        }
        Ok(FeatureMatrix {
            data,
            n_samples,
            n_features,
        })
    }

    #[inline]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Value of `feature` for `sample`.
    #[inline]
    pub fn get(&self, sample: usize, feature: usize) -> f32 {
        self.data[feature * self.n_samples + sample]
    }

    /// The full contiguous column for `feature`.
    #[inline]
    pub fn column(&self, feature: usize) -> &[f32] {
        let start = feature * self.n_samples;
        &self.data[start..start + self.n_samples]
    }
}

/// A batch of inference samples, stored **sample-major**: row `i` (all F
/// features of sample `i`) is contiguous. This is the natural layout for a
/// caller handing over one row at a time, and matches `predict_many`'s
/// contract in the core interface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleMatrix {
    data: Vec<f32>,
    n_samples: usize,
    n_features: usize,
}

impl SampleMatrix {
    pub fn from_sample_major(
        data: Vec<f32>,
        n_samples: usize,
        n_features: usize,
    ) -> ForestResult<Self> {
        if n_features == 0 {
            return Err(ForestError::InvalidShape {
                detail: "feature count must be nonzero".to_string(),
            });
        }
        if data.len() != n_samples * n_features {
            return Err(ForestError::InvalidShape {
                detail: format!(
                    "expected {} values ({} samples x {} features), got {}",
                    n_samples * n_features,
                    n_samples,
                    n_features,
                    data.len()
                ),
            });
        }
        for (i, &v) in data.iter().enumerate() {
            if !v.is_finite() {
                let sample = i / n_features;
                let feature = i % n_features;
                return Err(ForestError::NonFiniteValue { sample, feature });
            }
        }
        Ok(SampleMatrix {
            data,
            n_samples,
            n_features,
        })
    }

    #[inline]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Row `i` as a contiguous feature slice.
    #[inline]
    pub fn row(&self, i: usize) -> &[f32] {
        let start = i * self.n_features;
        &self.data[start..start + self.n_features]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_major_get_matches_column() {
        // 3 samples, 2 features, feature-major: [f0s0,f0s1,f0s2, f1s0,f1s1,f1s2]
        let m = FeatureMatrix::from_feature_major(
            vec![1.0, 2.0, 3.0, 10.0, 20.0, 30.0],
            3,
            2,
        )
        .unwrap();
        assert_eq!(m.get(0, 0), 1.0);
        assert_eq!(m.get(2, 0), 3.0);
        assert_eq!(m.get(1, 1), 20.0);
        assert_eq!(m.column(1), &[10.0, 20.0, 30.0]);
    }

    #[test]
    fn rejects_shape_mismatch() {
        let err = FeatureMatrix::from_feature_major(vec![1.0, 2.0, 3.0], 2, 2).unwrap_err();
        assert!(matches!(err, ForestError::InvalidShape { .. }));
    }

    #[test]
    fn rejects_non_finite() {
        let err = FeatureMatrix::from_feature_major(vec![1.0, f32::NAN], 2, 1).unwrap_err();
        assert!(matches!(err, ForestError::NonFiniteValue { .. }));
    }

    #[test]
    fn rejects_zero_features() {
        let err = FeatureMatrix::from_feature_major(vec![], 0, 0).unwrap_err();
        assert!(matches!(err, ForestError::InvalidShape { .. }));
    }

    #[test]
    fn sample_major_row_access() {
        let m = SampleMatrix::from_sample_major(vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
        assert_eq!(m.row(0), &[1.0, 2.0]);
        assert_eq!(m.row(1), &[3.0, 4.0]);
    }
}
