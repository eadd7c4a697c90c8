mod metrics;
mod sampling;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{EvaluationSettings, RecommenderSettings};
use crate::domain::RatingMatrix;
use crate::errors::{EvaluationError, RecommendError};
use crate::prediction::predict;

pub use metrics::{EvaluationResult, EvaluationSummary};
pub use sampling::{
    default_max_attempts, extract_test_set, test_set_size, SamplingMode, TestCase,
};

/// Progress of a hold-out evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationState {
    Idle,
    SamplingTestSet { iteration: usize },
    RunningTrials { iteration: usize },
    Reducing,
    Done,
}

/// Hold-out evaluation: withhold sampled ratings, predict them from the rest,
/// repeat, and reduce the outcomes to coverage and error statistics.
///
/// The borrowed matrix is never modified; every trial works on its own copy.
pub struct HoldoutEvaluator<'a> {
    ratings: &'a RatingMatrix,
    recommender: RecommenderSettings,
    settings: EvaluationSettings,
    state: EvaluationState,
    results: EvaluationResult,
    summary: Option<EvaluationSummary>,
}

impl<'a> HoldoutEvaluator<'a> {
    pub fn new(
        ratings: &'a RatingMatrix,
        recommender: RecommenderSettings,
        settings: EvaluationSettings,
    ) -> Self {
        Self {
            ratings,
            recommender,
            settings,
            state: EvaluationState::Idle,
            results: EvaluationResult::new(),
            summary: None,
        }
    }

    pub fn state(&self) -> EvaluationState {
        self.state
    }

    /// Outcomes of the last run, across all iterations
    pub fn results(&self) -> &EvaluationResult {
        &self.results
    }

    pub fn summary(&self) -> Option<&EvaluationSummary> {
        self.summary.as_ref()
    }

    pub fn coverage(&self) -> Result<f64, EvaluationError> {
        self.summary
            .as_ref()
            .map(|summary| summary.coverage)
            .ok_or(EvaluationError::NotEvaluated)
    }

    /// Mean squared error of the last run; `EmptyCoverage` when nothing was predicted
    pub fn mse(&self) -> Result<f64, EvaluationError> {
        self.summary
            .as_ref()
            .ok_or(EvaluationError::NotEvaluated)?
            .mse()
    }

    /// Run with the configured seed, or from entropy when none is set
    pub fn evaluate(&mut self) -> Result<&EvaluationSummary, EvaluationError> {
        let mut rng = match self.settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.evaluate_with_rng(&mut rng)
    }

    /// Run every iteration with `rng`; previous results are discarded
    pub fn evaluate_with_rng<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<&EvaluationSummary, EvaluationError> {
        self.validate()?;
        self.results = EvaluationResult::new();
        self.summary = None;

        let total_ratings = self.ratings.num_ratings();
        let size = test_set_size(total_ratings, self.settings.percentage);
        let max_attempts = self
            .settings
            .max_sampling_attempts
            .unwrap_or_else(|| default_max_attempts(total_ratings));

        info!(
            "Hold-out evaluation: {} iterations, {} of {} ratings withheld per trial",
            self.settings.iterations, size, total_ratings
        );

        for iteration in 1..=self.settings.iterations {
            self.transition(EvaluationState::SamplingTestSet { iteration });
            let mut working = self.ratings.clone();
            let test_set =
                extract_test_set(&mut working, size, self.settings.sampling, max_attempts, rng);

            self.transition(EvaluationState::RunningTrials { iteration });
            let predicted = self.run_trial(&working, &test_set)?;

            info!(
                "Trial {}/{}: predicted {} of {} withheld ratings",
                iteration,
                self.settings.iterations,
                predicted,
                test_set.len()
            );
        }

        self.transition(EvaluationState::Reducing);
        let summary = self.results.summarize();
        self.transition(EvaluationState::Done);

        Ok(self.summary.insert(summary))
    }

    fn validate(&self) -> Result<(), EvaluationError> {
        let percentage = self.settings.percentage;
        if !(percentage > 0.0 && percentage <= 1.0) {
            return Err(EvaluationError::InvalidPercentage(percentage));
        }
        if self.settings.iterations == 0 {
            return Err(EvaluationError::NoIterations);
        }
        if self.ratings.is_empty() {
            return Err(EvaluationError::EmptyMatrix);
        }
        if self.recommender.prediction_neighborhood_size == 0 {
            return Err(RecommendError::InvalidNeighborhoodSize.into());
        }
        Ok(())
    }

    fn run_trial(
        &mut self,
        working: &RatingMatrix,
        test_set: &[TestCase],
    ) -> Result<usize, EvaluationError> {
        let mut predicted = 0;

        for case in test_set {
            let prediction = predict(
                working,
                &case.user,
                &case.item,
                &self.recommender.metric,
                self.recommender.strategy,
                self.recommender.prediction_neighborhood_size,
            )?;

            if prediction.is_predicted() {
                predicted += 1;
            }
            self.results.record(case.rating, prediction);
        }

        Ok(predicted)
    }

    fn transition(&mut self, next: EvaluationState) {
        debug!("Evaluation state {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_user() -> RatingMatrix {
        [("A", "w", 2.0), ("A", "x", 5.0), ("A", "y", 3.0), ("A", "z", 4.0)]
            .into_iter()
            .collect()
    }

    fn synthetic(seed: u64, users: usize, items: usize, density: f64) -> RatingMatrix {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut matrix = RatingMatrix::new();

        for user in 0..users {
            for item in 0..items {
                if rng.gen_bool(density) {
                    let rating = rng.gen_range(1..=5) as f64;
                    matrix.insert(format!("u{}", user), format!("i{}", item), rating);
                }
            }
        }
        matrix
    }

    fn build_evaluator(matrix: &RatingMatrix, settings: EvaluationSettings) -> HoldoutEvaluator<'_> {
        HoldoutEvaluator::new(matrix, RecommenderSettings::default(), settings)
    }

    #[test]
    fn test_single_user_reports_empty_coverage() {
        let matrix = single_user();
        let settings = EvaluationSettings::default()
            .with_percentage(0.5)
            .with_iterations(1)
            .with_seed(1);
        let mut evaluator = build_evaluator(&matrix, settings);

        let summary = evaluator.evaluate().unwrap().clone();

        assert_eq!(summary.test_cases, 2);
        assert_eq!(summary.predicted, 0);
        assert_eq!(summary.coverage, 0.0);
        assert_eq!(evaluator.coverage(), Ok(0.0));
        assert_eq!(evaluator.mse(), Err(EvaluationError::EmptyCoverage));
        assert_eq!(evaluator.state(), EvaluationState::Done);
    }

    #[test]
    fn test_accessors_before_run() {
        let matrix = single_user();
        let evaluator = build_evaluator(&matrix, EvaluationSettings::default());

        assert_eq!(evaluator.state(), EvaluationState::Idle);
        assert_eq!(evaluator.coverage(), Err(EvaluationError::NotEvaluated));
        assert_eq!(evaluator.mse(), Err(EvaluationError::NotEvaluated));
    }

    #[test]
    fn test_invalid_settings() {
        let matrix = single_user();

        for percentage in [0.0, -0.1, 1.5, f64::NAN] {
            let mut evaluator =
                build_evaluator(&matrix, EvaluationSettings::default().with_percentage(percentage));
            assert!(matches!(
                evaluator.evaluate(),
                Err(EvaluationError::InvalidPercentage(_))
            ));
        }

        let mut evaluator = build_evaluator(&matrix, EvaluationSettings::default().with_iterations(0));
        assert_eq!(evaluator.evaluate().err(), Some(EvaluationError::NoIterations));

        let empty = RatingMatrix::new();
        let mut evaluator = build_evaluator(&empty, EvaluationSettings::default());
        assert_eq!(evaluator.evaluate().err(), Some(EvaluationError::EmptyMatrix));
    }

    #[test]
    fn test_iterations_accumulate_and_matrix_untouched() {
        let matrix = synthetic(7, 20, 15, 0.5);
        let before = matrix.clone();
        let size = test_set_size(matrix.num_ratings(), 0.1);

        let settings = EvaluationSettings::default()
            .with_percentage(0.1)
            .with_iterations(3)
            .with_seed(99);
        let mut evaluator = build_evaluator(&matrix, settings);
        let summary = evaluator.evaluate().unwrap().clone();

        assert_eq!(summary.test_cases, 3 * size);
        assert_eq!(evaluator.results().len(), 3 * size);
        assert!(summary.coverage > 0.0 && summary.coverage <= 1.0);
        assert!(summary.mse.unwrap() >= 0.0);
        assert_eq!(matrix, before);
    }

    #[test]
    fn test_rerun_discards_previous_results() {
        let matrix = synthetic(3, 10, 10, 0.6);
        let size = test_set_size(matrix.num_ratings(), 0.2);
        let mut evaluator = build_evaluator(&matrix, EvaluationSettings::default().with_seed(5));

        evaluator.evaluate().unwrap();
        evaluator.evaluate().unwrap();

        assert_eq!(evaluator.results().len(), size);
    }

    #[test]
    fn test_seed_reproducible() {
        let matrix = synthetic(11, 15, 12, 0.5);
        let settings = EvaluationSettings::default().with_iterations(2).with_seed(2024);

        let first = build_evaluator(&matrix, settings.clone()).evaluate().unwrap().clone();
        let second = build_evaluator(&matrix, settings).evaluate().unwrap().clone();

        assert_eq!(first, second);
    }

    #[test]
    fn test_withholding_everything_has_no_coverage() {
        let matrix = synthetic(13, 6, 6, 0.7);
        let settings = EvaluationSettings::default()
            .with_percentage(1.0)
            .with_sampling(SamplingMode::UniformOverRatings)
            .with_seed(8);
        let mut evaluator = build_evaluator(&matrix, settings);

        let summary = evaluator.evaluate().unwrap().clone();
        assert_eq!(summary.test_cases, matrix.num_ratings());
        assert_eq!(summary.coverage, 0.0);
        assert_eq!(evaluator.mse(), Err(EvaluationError::EmptyCoverage));
    }

    #[test]
    fn test_coverage_shrinks_as_more_is_withheld() {
        let matrix = synthetic(21, 30, 20, 0.5);

        let coverage_at = |percentage: f64| {
            let settings = EvaluationSettings::default()
                .with_percentage(percentage)
                .with_iterations(5)
                .with_seed(77);
            build_evaluator(&matrix, settings).evaluate().unwrap().coverage
        };

        let light = coverage_at(0.1);
        let heavy = coverage_at(0.8);
        assert!(
            light >= heavy,
            "coverage {} at 10% withheld below {} at 80%",
            light,
            heavy
        );
    }
}
