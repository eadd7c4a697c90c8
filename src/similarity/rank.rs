use std::cmp::Ordering;

use super::{ratio, Similarity, SimilarityMetric};
use crate::domain::{co_rated, ItemRatings};

/// Spearman correlation: Pearson product-moment of the average ranks of the
/// co-rated ratings
#[derive(Debug, Clone, Copy, Default)]
pub struct Spearman;

/// Spearman via the rank-difference formula `1 - 6 Σd² / (n(n² - 1))`.
///
/// Agrees with [`Spearman`] when there are no ties.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpearmanDistance;

impl SimilarityMetric for Spearman {
    fn compare(&self, a: &ItemRatings, b: &ItemRatings) -> Similarity {
        let Some((ranks_a, ranks_b)) = co_rated_ranks(a, b) else {
            return Similarity::Incomparable;
        };

        // average ranks always have mean (n + 1) / 2
        let mean = (ranks_a.len() as f64 + 1.0) / 2.0;
        let mut numerator = 0.0;
        let mut sum_sq_a = 0.0;
        let mut sum_sq_b = 0.0;

        for (ra, rb) in ranks_a.iter().zip(&ranks_b) {
            let da = ra - mean;
            let db = rb - mean;
            numerator += da * db;
            sum_sq_a += da * da;
            sum_sq_b += db * db;
        }

        ratio(numerator, (sum_sq_a * sum_sq_b).sqrt())
    }
}

impl SimilarityMetric for SpearmanDistance {
    fn compare(&self, a: &ItemRatings, b: &ItemRatings) -> Similarity {
        let Some((ranks_a, ranks_b)) = co_rated_ranks(a, b) else {
            return Similarity::Incomparable;
        };

        let n = ranks_a.len() as f64;
        if ranks_a.len() < 2 {
            return Similarity::ZeroVariance;
        }

        let sum_sq_diff: f64 = ranks_a
            .iter()
            .zip(&ranks_b)
            .map(|(ra, rb)| (ra - rb).powi(2))
            .sum();

        let rho = 1.0 - 6.0 * sum_sq_diff / (n * (n * n - 1.0));
        Similarity::Score(rho.clamp(-1.0, 1.0))
    }
}

fn co_rated_ranks(a: &ItemRatings, b: &ItemRatings) -> Option<(Vec<f64>, Vec<f64>)> {
    let pairs = co_rated(a, b);
    if pairs.is_empty() {
        return None;
    }

    let (values_a, values_b): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
    Some((average_ranks(&values_a), average_ranks(&values_b)))
}

/// 1-based ranks; tied values share the mean of the ranks they span
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&i, &j| values[i].partial_cmp(&values[j]).unwrap_or(Ordering::Equal));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;

    while start < order.len() {
        let end = tie_group_end(values, &order, start);
        // positions start..end hold ranks start+1 ..= end
        let shared_rank = (start + 1 + end) as f64 / 2.0;
        for &index in &order[start..end] {
            ranks[index] = shared_rank;
        }
        start = end;
    }

    ranks
}

fn tie_group_end(values: &[f64], order: &[usize], start: usize) -> usize {
    let value = values[order[start]];
    let mut end = start + 1;
    while end < order.len() && values[order[end]] == value {
        end += 1;
    }
    end
}
