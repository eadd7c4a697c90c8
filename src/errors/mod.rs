use thiserror::Error;

use crate::domain::UserId;

/// Malformed requests against the recommender
#[derive(Debug, Error, PartialEq)]
pub enum RecommendError {
    #[error("Rating matrix is empty: nothing to recommend from")]
    EmptyMatrix,
    #[error("Cannot compare user {0} with itself")]
    SelfComparison(UserId),
    #[error("Neighborhood size must be at least 1")]
    InvalidNeighborhoodSize,
}

/// Failures of a hold-out evaluation run
#[derive(Debug, Error, PartialEq)]
pub enum EvaluationError {
    #[error("No test case could be predicted: mean squared error is undefined")]
    EmptyCoverage,
    #[error("Rating matrix is empty: nothing to withhold")]
    EmptyMatrix,
    #[error("Test percentage must be in (0, 1], got {0}")]
    InvalidPercentage(f64),
    #[error("At least one iteration is required")]
    NoIterations,
    #[error("Evaluation has not been run yet")]
    NotEvaluated,
    #[error(transparent)]
    Recommend(#[from] RecommendError),
}

/// Add context to load errors
pub fn load_context(data_type: &str, path: &str) -> String {
    format!("Failed to load {} from: {}", data_type, path)
}

/// Add context to parse errors
pub fn parse_context(data_type: &str, line_number: usize) -> String {
    format!("Failed to parse {} on line {}", data_type, line_number)
}

/// Add context to write errors
pub fn write_context(data_type: &str, path: &str) -> String {
    format!("Failed to write {} to: {}", data_type, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            RecommendError::SelfComparison("42".to_string()).to_string(),
            "Cannot compare user 42 with itself"
        );
        assert_eq!(
            EvaluationError::InvalidPercentage(1.5).to_string(),
            "Test percentage must be in (0, 1], got 1.5"
        );
    }

    #[test]
    fn test_recommend_error_converts() {
        let err: EvaluationError = RecommendError::EmptyMatrix.into();
        assert_eq!(err, EvaluationError::Recommend(RecommendError::EmptyMatrix));
        assert_eq!(err.to_string(), RecommendError::EmptyMatrix.to_string());
    }

    #[test]
    fn test_context_strings() {
        assert_eq!(load_context("ratings", "u.data"), "Failed to load ratings from: u.data");
        assert_eq!(parse_context("rating", 3), "Failed to parse rating on line 3");
    }
}
