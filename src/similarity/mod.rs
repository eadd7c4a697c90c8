mod cosine;
mod msd;
mod pearson;
mod rank;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::{ItemRatings, RatingMatrix};
use crate::errors::RecommendError;

pub use cosine::Cosine;
pub use msd::MeanSquaredDifference;
pub use pearson::Pearson;
pub use rank::{average_ranks, Spearman, SpearmanDistance};

/// Score reported for users without co-rated items
pub const INCOMPARABLE_SCORE: f64 = -1.0;

/// Outcome of comparing two users' rating vectors
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Similarity {
    Score(f64),
    /// Co-rated items exist but a denominator vanished (flat or zero ratings)
    ZeroVariance,
    /// No co-rated items
    Incomparable,
}

impl Similarity {
    /// Numeric score used for ranking: incomparable ranks lowest, zero variance is neutral
    pub fn score(&self) -> f64 {
        match self {
            Similarity::Score(score) => *score,
            Similarity::ZeroVariance => 0.0,
            Similarity::Incomparable => INCOMPARABLE_SCORE,
        }
    }

    /// Only strictly positive scores qualify a user as a neighbor
    pub fn is_positive(&self) -> bool {
        self.score() > 0.0
    }
}

/// Agreement between two users' rating vectors over their co-rated items
pub trait SimilarityMetric {
    fn compare(&self, a: &ItemRatings, b: &ItemRatings) -> Similarity;
}

/// Selectable similarity metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    #[default]
    Pearson,
    MeanSquaredDifference,
    Cosine,
    Spearman,
    SpearmanDistance,
}

impl Metric {
    pub fn as_str(&self) -> &str {
        match self {
            Metric::Pearson => "pearson",
            Metric::MeanSquaredDifference => "mean-squared-difference",
            Metric::Cosine => "cosine",
            Metric::Spearman => "spearman",
            Metric::SpearmanDistance => "spearman-distance",
        }
    }
}

impl SimilarityMetric for Metric {
    fn compare(&self, a: &ItemRatings, b: &ItemRatings) -> Similarity {
        match self {
            Metric::Pearson => Pearson.compare(a, b),
            Metric::MeanSquaredDifference => MeanSquaredDifference.compare(a, b),
            Metric::Cosine => Cosine.compare(a, b),
            Metric::Spearman => Spearman.compare(a, b),
            Metric::SpearmanDistance => SpearmanDistance.compare(a, b),
        }
    }
}

/// Compare two users of `matrix`.
///
/// A user missing from the matrix has no ratings and is therefore
/// incomparable; comparing a user with itself is rejected.
pub fn similarity(
    matrix: &RatingMatrix,
    user_a: &str,
    user_b: &str,
    metric: &dyn SimilarityMetric,
) -> Result<Similarity, RecommendError> {
    if user_a == user_b {
        return Err(RecommendError::SelfComparison(user_a.to_string()));
    }

    match (matrix.user_ratings(user_a), matrix.user_ratings(user_b)) {
        (Some(a), Some(b)) => Ok(metric.compare(a, b)),
        _ => Ok(Similarity::Incomparable),
    }
}

/// Turn a correlation-style ratio into a similarity, guarding the denominator
fn ratio(numerator: f64, denominator: f64) -> Similarity {
    if denominator == 0.0 || !denominator.is_finite() {
        return Similarity::ZeroVariance;
    }

    let result = numerator / denominator;
    if !result.is_finite() {
        return Similarity::ZeroVariance;
    }
    Similarity::Score(result.clamp(-1.0, 1.0))
}
