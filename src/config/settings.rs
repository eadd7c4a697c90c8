use serde::Serialize;

use crate::evaluation::SamplingMode;
use crate::prediction::PredictionStrategy;
use crate::similarity::Metric;

/// Neighborhood size for plain neighborhood queries and recommendations
pub const GENERAL_NEIGHBORHOOD_SIZE: usize = 200;
/// Neighborhood size used when predicting a single rating
pub const PREDICTION_NEIGHBORHOOD_SIZE: usize = 300;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommenderSettings {
    pub metric: Metric,
    pub strategy: PredictionStrategy,
    pub general_neighborhood_size: usize,
    pub prediction_neighborhood_size: usize,
}

impl Default for RecommenderSettings {
    fn default() -> Self {
        Self {
            metric: Metric::default(),
            strategy: PredictionStrategy::default(),
            general_neighborhood_size: GENERAL_NEIGHBORHOOD_SIZE,
            prediction_neighborhood_size: PREDICTION_NEIGHBORHOOD_SIZE,
        }
    }
}

impl RecommenderSettings {
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_strategy(mut self, strategy: PredictionStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationSettings {
    /// Fraction of all ratings withheld per trial, in (0, 1]
    pub percentage: f64,
    pub iterations: usize,
    pub sampling: SamplingMode,
    /// Fixed seed for reproducible runs; entropy when absent
    pub seed: Option<u64>,
    /// Draws before position sampling falls back to uniform sampling;
    /// derived from the matrix size when absent
    pub max_sampling_attempts: Option<usize>,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            percentage: 0.2,
            iterations: 1,
            sampling: SamplingMode::default(),
            seed: None,
            max_sampling_attempts: None,
        }
    }
}

impl EvaluationSettings {
    pub fn with_percentage(mut self, percentage: f64) -> Self {
        self.percentage = percentage;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingMode) -> Self {
        self.sampling = sampling;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub recommender: RecommenderSettings,
    pub evaluation: EvaluationSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }
}
