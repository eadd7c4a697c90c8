use log::debug;

use crate::domain::{ItemRatings, RatingMatrix, UserId};
use crate::errors::RecommendError;
use crate::similarity::SimilarityMetric;

/// A positively correlated user and its similarity to the target
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub user: UserId,
    pub similarity: f64,
}

impl Neighbor {
    pub fn new(user: impl Into<UserId>, similarity: f64) -> Self {
        Self {
            user: user.into(),
            similarity,
        }
    }
}

/// Rank every other user against `target` and keep the best `max_size`
/// with a strictly positive similarity.
///
/// Order is descending by similarity, ties broken by ascending user id.
/// An unknown target or a target without positive matches yields an empty list.
pub fn select_neighbors(
    matrix: &RatingMatrix,
    target: &str,
    metric: &dyn SimilarityMetric,
    max_size: usize,
) -> Result<Vec<Neighbor>, RecommendError> {
    if max_size == 0 {
        return Err(RecommendError::InvalidNeighborhoodSize);
    }

    let Some(target_ratings) = matrix.user_ratings(target) else {
        return Ok(Vec::new());
    };

    let mut neighbors = score_candidates(matrix, target, target_ratings, metric);
    rank_neighbors(&mut neighbors);
    neighbors.truncate(max_size);

    debug!("Selected {} neighbors for user {}", neighbors.len(), target);
    Ok(neighbors)
}

fn score_candidates(
    matrix: &RatingMatrix,
    target: &str,
    target_ratings: &ItemRatings,
    metric: &dyn SimilarityMetric,
) -> Vec<Neighbor> {
    matrix
        .iter()
        .filter(|(user, _)| user.as_str() != target)
        .map(|(user, ratings)| (user, metric.compare(target_ratings, ratings)))
        .filter(|(_, similarity)| similarity.is_positive())
        .map(|(user, similarity)| Neighbor::new(user.clone(), similarity.score()))
        .collect()
}

fn rank_neighbors(neighbors: &mut [Neighbor]) {
    neighbors.sort_by(|a, b| {
        b.similarity
            .total_cmp(&a.similarity)
            .then_with(|| a.user.cmp(&b.user))
    });
}
