use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::settings::{EvaluationSettings, RecommenderSettings};
use crate::evaluation::SamplingMode;
use crate::prediction::PredictionStrategy;
use crate::services::DataSources;
use crate::similarity::Metric;

#[derive(Parser, Debug)]
#[command(author, version, about = "User-based neighborhood rating predictor")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct DataArgs {
    /// Ratings file, one `user<TAB>item<TAB>rating<TAB>timestamp` per line
    #[arg(long)]
    pub ratings: PathBuf,
    /// Item catalog, one `id|name|...` per line
    #[arg(long)]
    pub items: PathBuf,
}

impl DataArgs {
    pub fn sources(&self) -> DataSources {
        DataSources::new(&self.ratings, &self.items)
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ModelArgs {
    /// Similarity metric between users
    #[arg(long, value_enum, default_value_t = Metric::Pearson)]
    pub metric: Metric,
    /// How neighbor ratings are combined into a prediction
    #[arg(long, value_enum, default_value_t = PredictionStrategy::Resnick)]
    pub strategy: PredictionStrategy,
}

impl ModelArgs {
    pub fn apply(&self, settings: RecommenderSettings) -> RecommenderSettings {
        settings.with_metric(self.metric).with_strategy(self.strategy)
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct EvaluationArgs {
    /// Fraction of ratings withheld per iteration, in (0, 1]
    #[arg(long, default_value_t = 0.2)]
    pub percentage: f64,
    #[arg(long, default_value_t = 1)]
    pub iterations: usize,
    /// Seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long, value_enum, default_value_t = SamplingMode::ByPosition)]
    pub sampling: SamplingMode,
}

impl EvaluationArgs {
    pub fn apply(&self, settings: EvaluationSettings) -> EvaluationSettings {
        let settings = settings
            .with_percentage(self.percentage)
            .with_iterations(self.iterations)
            .with_sampling(self.sampling);

        match self.seed {
            Some(seed) => settings.with_seed(seed),
            None => settings,
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Withhold ratings, predict them back and report coverage and MSE
    Evaluate {
        #[command(flatten)]
        data: DataArgs,
        #[command(flatten)]
        model: ModelArgs,
        #[command(flatten)]
        evaluation: EvaluationArgs,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Predict a single rating
    Predict {
        #[command(flatten)]
        data: DataArgs,
        #[command(flatten)]
        model: ModelArgs,
        #[arg(long)]
        user: String,
        /// Item name as it appears in the catalog
        #[arg(long)]
        item: String,
    },
    /// Predict every `user<TAB>item` query of a file
    Batch {
        #[command(flatten)]
        data: DataArgs,
        #[command(flatten)]
        model: ModelArgs,
        #[arg(long)]
        queries: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// List the most similar users
    Neighbors {
        #[command(flatten)]
        data: DataArgs,
        #[command(flatten)]
        model: ModelArgs,
        #[arg(long)]
        user: String,
        /// Neighborhood size (defaults to the general neighborhood size)
        #[arg(long)]
        size: Option<usize>,
    },
    /// Recommend unrated items
    Recommend {
        #[command(flatten)]
        data: DataArgs,
        #[command(flatten)]
        model: ModelArgs,
        #[arg(long)]
        user: String,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Show matrix statistics
    Stats {
        #[command(flatten)]
        data: DataArgs,
    },
}
