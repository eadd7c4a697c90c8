use serde::Serialize;

use crate::domain::RatingValue;
use crate::errors::EvaluationError;
use crate::prediction::Prediction;

/// `(true rating, prediction)` outcomes accumulated across trials
#[derive(Debug, Clone, Default)]
pub struct EvaluationResult {
    outcomes: Vec<(RatingValue, Prediction)>,
}

impl EvaluationResult {
    pub fn new() -> Self {
        Self {
            outcomes: Vec::new(),
        }
    }

    pub fn record(&mut self, actual: RatingValue, prediction: Prediction) {
        self.outcomes.push((actual, prediction));
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn predicted_count(&self) -> usize {
        self.errors().count()
    }

    /// Fraction of test cases that received a prediction
    pub fn coverage(&self) -> f64 {
        if self.outcomes.is_empty() {
            return 0.0;
        }
        self.predicted_count() as f64 / self.outcomes.len() as f64
    }

    /// Mean squared error over the predicted cases only
    pub fn mse(&self) -> Result<f64, EvaluationError> {
        self.mean_of(|error| error * error)
    }

    pub fn rmse(&self) -> Result<f64, EvaluationError> {
        self.mse().map(f64::sqrt)
    }

    pub fn mae(&self) -> Result<f64, EvaluationError> {
        self.mean_of(f64::abs)
    }

    pub fn summarize(&self) -> EvaluationSummary {
        EvaluationSummary {
            test_cases: self.len(),
            predicted: self.predicted_count(),
            coverage: self.coverage(),
            mse: self.mse().ok(),
            rmse: self.rmse().ok(),
            mae: self.mae().ok(),
        }
    }

    fn errors(&self) -> impl Iterator<Item = f64> + '_ {
        self.outcomes
            .iter()
            .filter_map(|(actual, prediction)| prediction.value().map(|p| actual - p))
    }

    fn mean_of(&self, f: impl Fn(f64) -> f64) -> Result<f64, EvaluationError> {
        let (sum, count) = self
            .errors()
            .fold((0.0, 0usize), |(sum, count), error| (sum + f(error), count + 1));

        if count == 0 {
            return Err(EvaluationError::EmptyCoverage);
        }
        Ok(sum / count as f64)
    }
}

/// Reduced statistics of an evaluation run; error metrics are absent when nothing was predicted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationSummary {
    pub test_cases: usize,
    pub predicted: usize,
    pub coverage: f64,
    pub mse: Option<f64>,
    pub rmse: Option<f64>,
    pub mae: Option<f64>,
}

impl EvaluationSummary {
    pub fn mse(&self) -> Result<f64, EvaluationError> {
        self.mse.ok_or(EvaluationError::EmptyCoverage)
    }
}
