use super::{ratio, Similarity, SimilarityMetric};
use crate::domain::{co_rated, mean_rating, ItemRatings};

/// Pearson correlation over co-rated items.
///
/// Each user is centered on the mean of *all* of their ratings, not only the
/// co-rated ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pearson;

impl SimilarityMetric for Pearson {
    fn compare(&self, a: &ItemRatings, b: &ItemRatings) -> Similarity {
        let pairs = co_rated(a, b);
        if pairs.is_empty() {
            return Similarity::Incomparable;
        }

        let (Some(mean_a), Some(mean_b)) = (mean_rating(a), mean_rating(b)) else {
            return Similarity::Incomparable;
        };

        let (numerator, sum_sq_a, sum_sq_b) = accumulate_deviations(&pairs, mean_a, mean_b);
        ratio(numerator, (sum_sq_a * sum_sq_b).sqrt())
    }
}

fn accumulate_deviations(pairs: &[(f64, f64)], mean_a: f64, mean_b: f64) -> (f64, f64, f64) {
    pairs
        .iter()
        .fold((0.0, 0.0, 0.0), |(num, sq_a, sq_b), &(ra, rb)| {
            let da = ra - mean_a;
            let db = rb - mean_b;
            (num + da * db, sq_a + da * da, sq_b + db * db)
        })
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
    fn test_perfect_correlation() {
        let a = ratings(&[("x", 1.0), ("y", 2.0), ("z", 3.0)]);
        let b = ratings(&[("x", 2.0), ("y", 3.0), ("z", 4.0)]);

        let score = Pearson.compare(&a, &b).score();
        assert!((score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_centers_on_full_mean() {
        // b's mean (3.0) includes the non co-rated item w
        let a = ratings(&[("x", 4.0), ("y", 2.0)]);
        let b = ratings(&[("x", 4.0), ("y", 2.0), ("w", 3.0)]);

        // a: mean 3, deviations 1, -1; b: mean 3, deviations 1, -1
        let score = Pearson.compare(&a, &b).score();
        assert!((score - 1.0).abs() < 1e-12);

        let c = ratings(&[("x", 4.0), ("y", 2.0), ("w", 6.0)]);
        // c: mean 4, deviations 0, -2 -> 2 / sqrt(2 * 4)
        let score = Pearson.compare(&a, &c).score();
        assert!((score - 2.0 / 8.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_flat_ratings_are_zero_variance() {
        let a = ratings(&[("x", 3.0), ("y", 3.0)]);
        let b = ratings(&[("x", 1.0), ("y", 5.0)]);

        assert_eq!(Pearson.compare(&a, &b), Similarity::ZeroVariance);
    }

    #[test]
    fn test_single_co_rated_item_at_mean_is_zero_variance() {
        let a = ratings(&[("x", 3.0)]);
        let b = ratings(&[("x", 4.0), ("y", 2.0)]);

        assert_eq!(Pearson.compare(&a, &b), Similarity::ZeroVariance);
    }

    #[test]
    fn test_disjoint_is_incomparable() {
        let a = ratings(&[("x", 3.0)]);
        let b = ratings(&[("y", 3.0)]);

        assert_eq!(Pearson.compare(&a, &b), Similarity::Incomparable);
    }
}
