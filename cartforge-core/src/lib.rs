pub mod error;
pub mod matrix;

pub use error::{ForestError, ForestResult};
pub use matrix::{FeatureMatrix, SampleMatrix};
