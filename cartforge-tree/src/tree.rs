use cartforge_core::{ForestError, ForestResult};
use serde::{Deserialize, Serialize};

/// Sentinel for "no child" in `left`/`right`.
const NONE: i32 = -1;

/// A single trained tree, stored as five parallel arrays sized to
/// `2^(max_depth + 1) - 1` slots — a complete binary tree of that depth.
///
/// `left[i] > i` and `right[i] > i` whenever present; a slot is a leaf iff
/// `left[i] == right[i] == -1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatTree {
    feature: Vec<i32>,
    threshold: Vec<f32>,
    left: Vec<i32>,
    right: Vec<i32>,
    label: Vec<i32>,
    capacity: usize,
}

impl FlatTree {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        FlatTree {
            feature: vec![0; capacity],
            threshold: vec![0.0; capacity],
            left: vec![NONE; capacity],
            right: vec![NONE; capacity],
            label: vec![0; capacity],
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn write_leaf(&mut self, slot: usize, label: i32) -> ForestResult<()> {
        self.check_slot(slot)?;
        self.left[slot] = NONE;
        self.right[slot] = NONE;
        self.label[slot] = label;
        Ok(())
    }

    pub(crate) fn write_split(
        &mut self,
        slot: usize,
        feature: usize,
        threshold: f32,
    ) -> ForestResult<()> {
        self.check_slot(slot)?;
        self.feature[slot] = feature as i32;
        self.threshold[slot] = threshold;
        Ok(())
    }

    pub(crate) fn set_left(&mut self, slot: usize, child: usize) -> ForestResult<()> {
        self.check_slot(slot)?;
        self.left[slot] = child as i32;
        Ok(())
    }

    pub(crate) fn set_right(&mut self, slot: usize, child: usize) -> ForestResult<()> {
        self.check_slot(slot)?;
        self.right[slot] = child as i32;
        Ok(())
    }

    fn check_slot(&self, slot: usize) -> ForestResult<()> {
        if slot >= self.capacity {
            return Err(ForestError::CapacityExceeded {
                slot,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Branch-free-in-spirit traversal: descend while the current slot has a
    /// child, comparing the sample's value at the split feature against the
    /// threshold with strict `<` (consistent with the `upper_bound` used to
    /// assign bins during training).
    pub fn predict(&self, sample: &[f32]) -> i32 {
        let mut slot = 0usize;
        while self.left[slot] != NONE || self.right[slot] != NONE {
            let feature = self.feature[slot] as usize;
            let value = sample[feature];
            slot = if value < self.threshold[slot] {
                self.left[slot] as usize
            } else {
                self.right[slot] as usize
            };
        }
        self.label[slot]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_tree() -> FlatTree {
        // root splits feature 0 at 2.5; left leaf = 0, right leaf = 1.
        let mut t = FlatTree::with_capacity(3);
        t.write_split(0, 0, 2.5).unwrap();
        t.write_leaf(1, 0).unwrap();
        t.write_leaf(2, 1).unwrap();
        t.set_left(0, 1).unwrap();
        t.set_right(0, 2).unwrap();
        t
    }

    #[test]
    fn predict_routes_by_threshold() {
        let t = tiny_tree();
        assert_eq!(t.predict(&[1.0]), 0);
        assert_eq!(t.predict(&[2.5]), 1);
        assert_eq!(t.predict(&[9.0]), 1);
    }

    #[test]
    fn predict_is_idempotent() {
        let t = tiny_tree();
        let a = t.predict(&[1.0]);
        let b = t.predict(&[1.0]);
        assert_eq!(a, b);
    }

    #[test]
    fn write_past_capacity_is_an_error() {
        let mut t = FlatTree::with_capacity(1);
        assert!(t.write_leaf(0, 0).is_ok());
        assert!(matches!(
            t.write_leaf(1, 0),
            Err(ForestError::CapacityExceeded { .. })
        ));
    }
}
