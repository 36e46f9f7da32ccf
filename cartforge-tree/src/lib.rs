//! CART decision trees and a bagging random-forest ensemble, built on
//! per-feature quantile-binned features.
//!
//! - [`impurity`] — Gini impurity, majority-label and bootstrap sampling primitives.
//! - [`binner`] — per-feature quantile discretization into up to 256 bins.
//! - [`tree`] — the flat, fixed-capacity tree layout and its predictor.
//! - [`builder`] — the iterative, explicit-stack split-search tree builder.
//! - [`forest`] — the bagging ensemble: parallel per-tree training and majority-vote prediction.

pub mod binner;
pub mod builder;
pub mod forest;
pub mod impurity;
pub mod tree;

pub use binner::{discretize, BinnedMatrix, EdgeTable, MAX_BINS};
pub use builder::{build_tree, tree_capacity};
pub use forest::Forest;
pub use impurity::{bootstrap, gini, gini_of, histogram, majority_label, majority_label_of};
pub use tree::FlatTree;
