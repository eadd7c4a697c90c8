mod recommendations;

use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::domain::{mean_rating, RatingMatrix, RatingValue};
use crate::errors::RecommendError;
use crate::neighborhood::{select_neighbors, Neighbor};
use crate::similarity::SimilarityMetric;

pub use recommendations::{recommend_items, RecommendedItem};

/// How neighbor ratings are combined into a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PredictionStrategy {
    /// Resnick's formula: the user's mean plus the weighted mean-centered neighbor ratings
    #[default]
    Resnick,
    /// Similarity-weighted average of the raw neighbor ratings
    WeightedAverage,
}

impl PredictionStrategy {
    pub fn as_str(&self) -> &str {
        match self {
            PredictionStrategy::Resnick => "resnick",
            PredictionStrategy::WeightedAverage => "weighted-average",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotComputableReason {
    /// The user already rated the item
    AlreadyRated,
    /// No positively correlated neighbor rated the item
    InsufficientNeighbors,
    /// The user has no ratings at all
    NoRatingHistory,
}

impl NotComputableReason {
    pub fn as_str(&self) -> &str {
        match self {
            NotComputableReason::AlreadyRated => "already rated",
            NotComputableReason::InsufficientNeighbors => "insufficient neighbors",
            NotComputableReason::NoRatingHistory => "no rating history",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Prediction {
    Predicted(RatingValue),
    NotComputable(NotComputableReason),
}

impl Prediction {
    pub fn value(&self) -> Option<RatingValue> {
        match self {
            Prediction::Predicted(value) => Some(*value),
            Prediction::NotComputable(_) => None,
        }
    }

    pub fn is_predicted(&self) -> bool {
        matches!(self, Prediction::Predicted(_))
    }
}

/// A neighbor's rating of the target item together with what is needed to weigh it
struct Contribution {
    similarity: f64,
    rating: RatingValue,
    neighbor_mean: RatingValue,
}

/// Predict `user`'s rating of `item` from up to `neighborhood_size` neighbors.
///
/// The result is not clamped to the rating scale.
pub fn predict(
    matrix: &RatingMatrix,
    user: &str,
    item: &str,
    metric: &dyn SimilarityMetric,
    strategy: PredictionStrategy,
    neighborhood_size: usize,
) -> Result<Prediction, RecommendError> {
    let Some(user_ratings) = matrix.user_ratings(user) else {
        return Ok(Prediction::NotComputable(NotComputableReason::NoRatingHistory));
    };

    if user_ratings.contains_key(item) {
        return Ok(Prediction::NotComputable(NotComputableReason::AlreadyRated));
    }

    let neighbors = select_neighbors(matrix, user, metric, neighborhood_size)?;
    let contributions = collect_contributions(matrix, &neighbors, item);

    if contributions.is_empty() {
        debug!("No neighbor of {} rated {}", user, item);
        return Ok(Prediction::NotComputable(NotComputableReason::InsufficientNeighbors));
    }

    let value = match strategy {
        PredictionStrategy::Resnick => {
            let own_mean = mean_rating(user_ratings).unwrap_or_default();
            own_mean + weighted_mean(&contributions, |c| c.rating - c.neighbor_mean)
        }
        PredictionStrategy::WeightedAverage => weighted_mean(&contributions, |c| c.rating),
    };

    Ok(Prediction::Predicted(value))
}

fn collect_contributions(
    matrix: &RatingMatrix,
    neighbors: &[Neighbor],
    item: &str,
) -> Vec<Contribution> {
    neighbors
        .iter()
        .filter_map(|neighbor| {
            let ratings = matrix.user_ratings(&neighbor.user)?;
            let rating = *ratings.get(item)?;
            Some(Contribution {
                similarity: neighbor.similarity,
                rating,
                neighbor_mean: mean_rating(ratings)?,
            })
        })
        .collect()
}

/// Σ sim · term / Σ sim; neighbors are strictly positive so the sum is non-zero
fn weighted_mean(contributions: &[Contribution], term: impl Fn(&Contribution) -> f64) -> f64 {
    let (numerator, denominator) = contributions
        .iter()
        .fold((0.0, 0.0), |(num, den), c| {
            (num + c.similarity * term(c), den + c.similarity)
        });

    numerator / denominator
}
