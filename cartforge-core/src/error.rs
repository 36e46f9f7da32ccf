use thiserror::Error;

/// Core error type shared by the binner, the tree builder and the forest.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForestError {
    #[error("invalid shape: {detail}")]
    InvalidShape { detail: String },

    #[error("invalid label {label}: expected a value in [0, {n_classes})")]
    InvalidLabel { label: i32, n_classes: usize },

    #[error("non-finite value at sample {sample}, feature {feature}")]
    NonFiniteValue { sample: usize, feature: usize },

    #[error("tree builder attempted to write slot {slot}, capacity is {capacity}")]
    CapacityExceeded { slot: usize, capacity: usize },
}

pub type ForestResult<T> = Result<T, ForestError>;
