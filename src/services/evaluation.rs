use anyhow::Result;
use colored::Colorize;
use log::info;
use serde::Serialize;

use crate::config::settings::{AppConfig, EvaluationSettings, RecommenderSettings};
use crate::evaluation::{EvaluationSummary, HoldoutEvaluator};
use crate::services::DataSources;

#[derive(Debug, Serialize)]
struct EvaluationReport<'a> {
    recommender: &'a RecommenderSettings,
    evaluation: &'a EvaluationSettings,
    summary: &'a EvaluationSummary,
}

pub struct EvaluationService {
    config: AppConfig,
    sources: DataSources,
    json: bool,
}

impl EvaluationService {
    pub fn new(config: AppConfig, sources: DataSources, json: bool) -> Self {
        Self {
            config,
            sources,
            json,
        }
    }

    pub fn run(&self) -> Result<EvaluationSummary> {
        info!("=== Starting Hold-out Evaluation ===");

        let matrix = self.sources.load()?;
        let mut evaluator = HoldoutEvaluator::new(
            &matrix,
            self.config.recommender.clone(),
            self.config.evaluation.clone(),
        );
        let summary = evaluator.evaluate()?.clone();

        info!("=== Evaluation Complete ===");

        if self.json {
            println!("{}", self.render_json(&summary)?);
        } else {
            self.print_summary(&summary);
        }
        Ok(summary)
    }

    fn render_json(&self, summary: &EvaluationSummary) -> Result<String> {
        let report = EvaluationReport {
            recommender: &self.config.recommender,
            evaluation: &self.config.evaluation,
            summary,
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }

    fn print_summary(&self, summary: &EvaluationSummary) {
        let recommender = &self.config.recommender;
        println!("{}", "Hold-out evaluation".bold());
        println!(
            "  Metric: {}, strategy: {}, {} iteration(s) at {:.0}% withheld",
            recommender.metric.as_str(),
            recommender.strategy.as_str(),
            self.config.evaluation.iterations,
            self.config.evaluation.percentage * 100.0
        );
        println!("  Test cases: {}", summary.test_cases);
        println!("  Predicted:  {}", summary.predicted);
        println!("  Coverage:   {}", format!("{:.4}", summary.coverage).green());

        match (summary.mse, summary.rmse, summary.mae) {
            (Some(mse), Some(rmse), Some(mae)) => {
                println!("  MSE:        {}", format!("{:.4}", mse).green());
                println!("  RMSE:       {:.4}", rmse);
                println!("  MAE:        {:.4}", mae);
            }
            _ => println!(
                "  MSE:        {}",
                "undefined, no test case could be predicted".yellow()
            ),
        }
    }
}
