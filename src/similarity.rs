//! String similarity oracles.

/// Bounded string-similarity score; higher means more similar.
///
/// Implementations must be pure functions of their two arguments and return
/// values in `[0, max_score]`.
pub trait SimilarityOracle {
    /// Similarity of `a` and `b` on the `[0, max_score]` scale.
    fn similarity(&self, a: &str, b: &str) -> f32;

    /// Largest score the oracle can return.
    fn max_score(&self) -> f32;
}

/// Normalized indel similarity on a 0-100 scale.
///
/// Computes `100 * (1 - distance / (|a| + |b|))` where `distance` is the
/// minimum number of character insertions and deletions turning `a` into
/// `b`. Two empty strings score 100.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndelRatio;

impl SimilarityOracle for IndelRatio {
    fn similarity(&self, a: &str, b: &str) -> f32 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let total = a.len() + b.len();
        if total == 0 {
            return 100.0;
        }

        let distance = total - 2 * lcs_length(&a, &b);
        100.0 * (1.0 - distance as f32 / total as f32)
    }

    fn max_score(&self) -> f32 {
        100.0
    }
}

/// Length of the longest common subsequence. O(|a|·|b|) time, O(|b|) space.
fn lcs_length(a: &[char], b: &[char]) -> usize {
    let mut row = vec![0usize; b.len() + 1];

    for &ca in a {
        let mut diag = 0;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diag + 1
            } else {
                above.max(row[j])
            };
            diag = above;
        }
    }

    row[b.len()]
}
