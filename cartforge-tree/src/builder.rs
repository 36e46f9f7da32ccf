use rand::rngs::StdRng;

use cartforge_core::ForestResult;

use crate::binner::{BinnedMatrix, EdgeTable};
use crate::impurity::{gini, histogram, majority_label};
use crate::tree::FlatTree;

/// `2^(max_depth + 1) - 1`: the slot count of a complete binary tree of that depth.
pub fn tree_capacity(max_depth: usize) -> usize {
    (1usize << (max_depth + 1)) - 1
}

enum Phase {
    Expand,
    AfterLeft,
    AfterRight,
}

/// One level of the explicit build stack. `samples` holds indices into the
/// *shared* binned matrix / label vector — including duplicates introduced by
/// bootstrap sampling — never a physically bootstrapped copy.
struct Frame {
    samples: Vec<usize>,
    depth: usize,
    cursor: usize,
    phase: Phase,
    left_root: usize,
    right_root: usize,
    pending_right: Option<Vec<usize>>,
}

struct BestSplit {
    feature: usize,
    threshold: f32,
    gain: f32,
    left: Vec<usize>,
    right: Vec<usize>,
}

/// Build one tree in place, writing into slots starting at the caller's
/// `root_samples`' frame (always slot 0 for a freshly allocated tree).
///
/// Iterative by design: an explicit stack of [`Frame`]s stands in for the
/// call stack a recursive builder would use, so build depth is bounded by
/// `max_depth` rather than the platform's native stack, and so a future
/// intra-tree-parallel split search has an obvious place to fork from.
pub fn build_tree(
    x_binned: &BinnedMatrix,
    edges: &EdgeTable,
    y: &[i32],
    n_classes: usize,
    n_features: usize,
    max_depth: usize,
    root_samples: Vec<usize>,
    rng: &mut StdRng,
) -> ForestResult<FlatTree> {
    let capacity = tree_capacity(max_depth);
    let mut tree = FlatTree::with_capacity(capacity);

    let mut stack: Vec<Frame> = vec![Frame {
        samples: root_samples,
        depth: 0,
        cursor: 0,
        phase: Phase::Expand,
        left_root: 0,
        right_root: 0,
        pending_right: None,
    }];

    // Highest slot index used so far — mirrors a single shared cursor that
    // every leaf write or completed subtree advances, read by the parent
    // frame to place its next child.
    let mut last_index = 0usize;

    while let Some(top) = stack.last_mut() {
        match top.phase {
            Phase::Expand => {
                let slot = top.cursor;
                let depth = top.depth;
                let n = top.samples.len();

                let labels: Vec<i32> = top.samples.iter().map(|&i| y[i]).collect();
                let hist = histogram(&labels, n_classes);
                let is_pure = hist.iter().filter(|&&c| c > 0).count() <= 1;

                if depth >= max_depth || is_pure {
                    tree.write_leaf(slot, majority_label(&hist))?;
                    last_index = slot;
                    stack.pop();
                    continue;
                }

                let m = ((n_features as f64).sqrt().floor() as usize)
                    .max(1)
                    .min(n_features);
                let selected = rand::seq::index::sample(rng, n_features, m);

                let parent_gini = gini(&hist);
                let mut best: Option<BestSplit> = None;

                for feature in selected.iter() {
                    let column = x_binned.column(feature);
                    let mut sorted = top.samples.clone();
                    sorted.sort_by_key(|&s| column[s]);

                    let mut left_hist = vec![0u32; n_classes];
                    let mut right_hist = hist.clone();

                    for i in 0..n.saturating_sub(1) {
                        let moved = sorted[i];
                        let cls = y[moved] as usize;
                        left_hist[cls] += 1;
                        right_hist[cls] -= 1;

                        if column[sorted[i]] == column[sorted[i + 1]] {
                            continue;
                        }

                        let n_l = i + 1;
                        let n_r = n - n_l;
                        let gain = parent_gini
                            - (n_l as f32 / n as f32) * gini(&left_hist)
                            - (n_r as f32 / n as f32) * gini(&right_hist);

                        let current_best = best.as_ref().map(|b| b.gain).unwrap_or(0.0);
                        if gain > current_best {
                            let bin = column[sorted[i + 1]] as usize;
                            best = Some(BestSplit {
                                feature,
                                threshold: edges.edge(feature, bin),
                                gain,
                                left: sorted[0..=i].to_vec(),
                                right: sorted[i + 1..].to_vec(),
                            });
                        }
                    }
                }

                match best {
                    Some(b) if slot + 1 < capacity => {
                        tree.write_split(slot, b.feature, b.threshold)?;
                        let left_root = slot + 1;
                        top.left_root = left_root;
                        top.pending_right = Some(b.right);
                        top.phase = Phase::AfterLeft;
                        stack.push(Frame {
                            samples: b.left,
                            depth: depth + 1,
                            cursor: left_root,
                            phase: Phase::Expand,
                            left_root: 0,
                            right_root: 0,
                            pending_right: None,
                        });
                    }
                    _ => {
                        tree.write_leaf(slot, majority_label(&hist))?;
                        last_index = slot;
                        stack.pop();
                    }
                }
            }

            Phase::AfterLeft => {
                let slot = top.cursor;
                tree.set_left(slot, top.left_root)?;
                let right_root = last_index + 1;
                top.right_root = right_root;
                let right_samples = top
                    .pending_right
                    .take()
                    .expect("pending_right set when entering AfterLeft");
                let depth = top.depth;
                top.phase = Phase::AfterRight;
                stack.push(Frame {
                    samples: right_samples,
                    depth: depth + 1,
                    cursor: right_root,
                    phase: Phase::Expand,
                    left_root: 0,
                    right_root: 0,
                    pending_right: None,
                });
            }

            Phase::AfterRight => {
                let slot = top.cursor;
                tree.set_right(slot, top.right_root)?;
                stack.pop();
            }
        }
    }

    let _ = last_index;
    Ok(tree)
}
