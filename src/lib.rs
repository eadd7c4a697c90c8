pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod evaluation;
pub mod loader;
pub mod neighborhood;
pub mod prediction;
pub mod recommender;
pub mod services;
pub mod similarity;

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

use crate::cli::{Command, DataArgs, EvaluationArgs, ModelArgs};
use crate::config::settings::AppConfig;
use crate::services::batch::BatchPredictionService;
use crate::services::evaluation::EvaluationService;
use crate::services::query::{print_stats, QueryService};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

fn config_for(model: &ModelArgs) -> AppConfig {
    let mut config = AppConfig::new();
    config.recommender = model.apply(config.recommender);
    config
}

pub fn handle_evaluate(
    data: &DataArgs,
    model: &ModelArgs,
    evaluation: &EvaluationArgs,
    json: bool,
) -> Result<()> {
    let mut config = config_for(model);
    config.evaluation = evaluation.apply(config.evaluation);
    let service = EvaluationService::new(config, data.sources(), json);
    service.run()?;
    Ok(())
}

pub fn handle_predict(data: &DataArgs, model: &ModelArgs, user: &str, item: &str) -> Result<()> {
    let service = QueryService::new(config_for(model), &data.sources())?;
    service.predict(user, item)?;
    Ok(())
}

pub fn handle_batch(
    data: &DataArgs,
    model: &ModelArgs,
    queries: &Path,
    output: &Path,
) -> Result<()> {
    let service = BatchPredictionService::new(
        config_for(model),
        data.sources(),
        queries.to_path_buf(),
        output.to_path_buf(),
    );
    service.run()?;
    Ok(())
}

pub fn handle_neighbors(
    data: &DataArgs,
    model: &ModelArgs,
    user: &str,
    size: Option<usize>,
) -> Result<()> {
    let service = QueryService::new(config_for(model), &data.sources())?;
    service.neighbors(user, size)?;
    Ok(())
}

pub fn handle_recommend(data: &DataArgs, model: &ModelArgs, user: &str, limit: usize) -> Result<()> {
    let service = QueryService::new(config_for(model), &data.sources())?;
    service.recommend(user, limit)?;
    Ok(())
}

pub fn handle_stats(data: &DataArgs) -> Result<()> {
    let matrix = data.sources().load()?;
    print_stats(&matrix);
    Ok(())
}
