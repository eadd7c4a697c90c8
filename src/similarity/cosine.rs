use super::{ratio, Similarity, SimilarityMetric};
use crate::domain::{co_rated, ItemRatings};

/// Cosine of the raw co-rated rating vectors
#[derive(Debug, Clone, Copy, Default)]
pub struct Cosine;

impl SimilarityMetric for Cosine {
    fn compare(&self, a: &ItemRatings, b: &ItemRatings) -> Similarity {
        let pairs = co_rated(a, b);
        if pairs.is_empty() {
            return Similarity::Incomparable;
        }

        let mut dot = 0.0;
        let mut norm_a = 0.0;
        let mut norm_b = 0.0;

        for (ra, rb) in pairs {
            dot += ra * rb;
            norm_a += ra * ra;
            norm_b += rb * rb;
        }

        ratio(dot, (norm_a * norm_b).sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratings(entries: &[(&str, f64)]) -> ItemRatings {
        entries
            .iter()
            .map(|(item, rating)| (item.to_string(), *rating))
            .collect()
    }

    #[test]
    fn test_parallel_vectors() {
        let a = ratings(&[("x", 1.0), ("y", 2.0)]);
        let b = ratings(&[("x", 2.0), ("y", 4.0), ("z", 1.0)]);

        assert!((Cosine.compare(&a, &b).score() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_known_angle() {
        let a = ratings(&[("x", 3.0), ("y", 4.0)]);
        let b = ratings(&[("x", 4.0), ("y", 3.0)]);

        // 24 / (5 * 5)
        assert!((Cosine.compare(&a, &b).score() - 0.96).abs() < 1e-12);
    }

    #[test]
    fn test_zero_magnitude() {
        let a = ratings(&[("x", 0.0)]);
        let b = ratings(&[("x", 4.0)]);

        assert_eq!(Cosine.compare(&a, &b), Similarity::ZeroVariance);
    }

    #[test]
    fn test_disjoint_is_incomparable() {
        let a = ratings(&[("x", 1.0)]);
        let b = ratings(&[("y", 1.0)]);

        assert_eq!(Cosine.compare(&a, &b), Similarity::Incomparable);
    }
}
