use log::info;

use crate::config::RecommenderSettings;
use crate::domain::{ItemId, RatingMatrix, UserId};
use crate::errors::RecommendError;
use crate::neighborhood::{select_neighbors, Neighbor};
use crate::prediction::{self, Prediction, RecommendedItem};
use crate::similarity::{self, Similarity};

/// Prediction outcome for one `(user, item)` query of a batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchPrediction {
    pub user: UserId,
    pub item: ItemId,
    pub prediction: Prediction,
}

/// User-based neighborhood recommender over an owned rating matrix
pub struct Recommender {
    ratings: RatingMatrix,
    settings: RecommenderSettings,
}

impl Recommender {
    /// Create a recommender; an empty matrix is rejected
    pub fn new(ratings: RatingMatrix, settings: RecommenderSettings) -> Result<Self, RecommendError> {
        if ratings.is_empty() {
            return Err(RecommendError::EmptyMatrix);
        }
        if settings.general_neighborhood_size == 0 || settings.prediction_neighborhood_size == 0 {
            return Err(RecommendError::InvalidNeighborhoodSize);
        }

        info!(
            "Recommender ready: {} users, {} ratings, metric {}, strategy {}",
            ratings.num_users(),
            ratings.num_ratings(),
            settings.metric.as_str(),
            settings.strategy.as_str()
        );

        Ok(Self { ratings, settings })
    }

    pub fn ratings(&self) -> &RatingMatrix {
        &self.ratings
    }

    pub fn settings(&self) -> &RecommenderSettings {
        &self.settings
    }

    pub fn similarity(&self, user_a: &str, user_b: &str) -> Result<Similarity, RecommendError> {
        similarity::similarity(&self.ratings, user_a, user_b, &self.settings.metric)
    }

    /// Neighborhood of `user` using the general neighborhood size
    pub fn neighbors(&self, user: &str) -> Result<Vec<Neighbor>, RecommendError> {
        self.neighbors_with_size(user, self.settings.general_neighborhood_size)
    }

    pub fn neighbors_with_size(&self, user: &str, size: usize) -> Result<Vec<Neighbor>, RecommendError> {
        select_neighbors(&self.ratings, user, &self.settings.metric, size)
    }

    pub fn predict(&self, user: &str, item: &str) -> Result<Prediction, RecommendError> {
        prediction::predict(
            &self.ratings,
            user,
            item,
            &self.settings.metric,
            self.settings.strategy,
            self.settings.prediction_neighborhood_size,
        )
    }

    /// Predict every query, preserving input order
    pub fn predict_batch<U, I>(&self, queries: &[(U, I)]) -> Result<Vec<BatchPrediction>, RecommendError>
    where
        U: AsRef<str>,
        I: AsRef<str>,
    {
        queries
            .iter()
            .map(|(user, item)| {
                let prediction = self.predict(user.as_ref(), item.as_ref())?;
                Ok(BatchPrediction {
                    user: user.as_ref().to_string(),
                    item: item.as_ref().to_string(),
                    prediction,
                })
            })
            .collect()
    }

    pub fn recommend(&self, user: &str, limit: usize) -> Result<Vec<RecommendedItem>, RecommendError> {
        prediction::recommend_items(
            &self.ratings,
            user,
            &self.settings.metric,
            self.settings.general_neighborhood_size,
            limit,
        )
    }
}
