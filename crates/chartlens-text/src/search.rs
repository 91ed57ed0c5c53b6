use std::cmp::Ordering;

/// Results must score strictly above this to be returned.
pub const MIN_SIMILARITY: f64 = 0.1;

/// Cosine similarity of two vectors of equal length.
///
/// Zero when either vector has zero magnitude, so empty documents and
/// queries with no known terms never divide by zero. Vectors of different
/// lengths are compared over their common prefix.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Orders `(position, score)` pairs by descending score, keeps those above
/// [`MIN_SIMILARITY`] and returns at most `top_k` of them.
///
/// The sort is stable, so equal scores stay in insertion order.
pub(crate) fn rank(mut scored: Vec<(usize, f64)>, top_k: usize) -> Vec<(usize, f64)> {
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored
        .into_iter()
        .filter(|(_, score)| *score > MIN_SIMILARITY)
        .take(top_k)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_score_one() {
        let v = [0.5, -0.25, 2.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn orthogonal_and_zero_vectors_score_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 3.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn rank_is_stable_for_ties() {
        let ranked = rank(vec![(0, 0.5), (1, 0.9), (2, 0.5), (3, 0.1), (4, 0.05)], 10);
        assert_eq!(ranked, vec![(1, 0.9), (0, 0.5), (2, 0.5)]);
    }

    #[test]
    fn rank_truncates_after_filtering() {
        let ranked = rank(vec![(0, 0.2), (1, 0.3), (2, 0.4)], 2);
        assert_eq!(ranked, vec![(2, 0.4), (1, 0.3)]);
        assert!(rank(vec![(0, 0.9)], 0).is_empty());
    }
}
