use rand::Rng;

/// Argmax of a class histogram, ties broken by the lowest class index.
pub fn majority_label(histogram: &[u32]) -> i32 {
    let mut best_class = 0usize;
    let mut best_count = 0u32;
    for (class, &count) in histogram.iter().enumerate() {
        if count > best_count {
            best_count = count;
            best_class = class;
        }
    }
    best_class as i32
}

/// Majority label of a raw label sequence, built via its histogram.
pub fn majority_label_of(labels: &[i32], n_classes: usize) -> i32 {
    majority_label(&histogram(labels, n_classes))
}

/// Class-count histogram of `labels` over `n_classes` classes.
pub fn histogram(labels: &[i32], n_classes: usize) -> Vec<u32> {
    let mut hist = vec![0u32; n_classes];
    for &label in labels {
        hist[label as usize] += 1;
    }
    hist
}

/// Gini impurity of a class-count histogram: `1 - sum(count^2) / n^2`.
/// Returns 0 for an empty histogram. Always in `[0, 1 - 1/C]`.
pub fn gini(histogram: &[u32]) -> f32 {
    let n: u64 = histogram.iter().map(|&c| c as u64).sum();
    if n == 0 {
        return 0.0;
    }
    let sum_sq: u64 = histogram.iter().map(|&c| (c as u64) * (c as u64)).sum();
    1.0 - (sum_sq as f64 / (n * n) as f64) as f32
}

/// Gini impurity of a raw label sequence.
pub fn gini_of(labels: &[i32], n_classes: usize) -> f32 {
    gini(&histogram(labels, n_classes))
}

/// Draw `n` indices in `[0, n)` uniformly with replacement.
pub fn bootstrap(n: usize, rng: &mut impl Rng) -> Vec<usize> {
    (0..n).map(|_| rng.gen_range(0..n)).collect()
}
