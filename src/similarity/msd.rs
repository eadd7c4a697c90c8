use super::{Similarity, SimilarityMetric};
use crate::domain::{co_rated, ItemRatings};

/// Largest squared difference on a 1–5 rating scale
const MAX_SQUARED_DIFFERENCE: f64 = 16.0;

/// Mean squared difference turned into a similarity: `1 - msd / 16`
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanSquaredDifference;

impl SimilarityMetric for MeanSquaredDifference {
    fn compare(&self, a: &ItemRatings, b: &ItemRatings) -> Similarity {
        let pairs = co_rated(a, b);
        if pairs.is_empty() {
            return Similarity::Incomparable;
        }

        let sum_of_squares: f64 = pairs.iter().map(|(ra, rb)| (ra - rb).powi(2)).sum();
        let difference = sum_of_squares / pairs.len() as f64;

        Similarity::Score(1.0 - difference / MAX_SQUARED_DIFFERENCE)
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
    fn test_identical_ratings() {
        let a = ratings(&[("x", 2.0), ("y", 5.0)]);
        assert_eq!(MeanSquaredDifference.compare(&a, &a), Similarity::Score(1.0));
    }

    #[test]
    fn test_opposite_extremes() {
        let a = ratings(&[("x", 1.0)]);
        let b = ratings(&[("x", 5.0)]);

        assert_eq!(MeanSquaredDifference.compare(&a, &b), Similarity::Score(0.0));
    }

    #[test]
    fn test_averages_over_co_rated() {
        let a = ratings(&[("x", 1.0), ("y", 3.0), ("w", 5.0)]);
        let b = ratings(&[("x", 3.0), ("y", 3.0)]);

        // (4 + 0) / 2 = 2 -> 1 - 2/16
        let score = MeanSquaredDifference.compare(&a, &b).score();
        assert!((score - 0.875).abs() < 1e-12);
    }

    #[test]
    fn test_disjoint_is_incomparable() {
        let a = ratings(&[("x", 1.0)]);
        let b = ratings(&[("y", 1.0)]);

        assert_eq!(MeanSquaredDifference.compare(&a, &b), Similarity::Incomparable);
    }
}
