use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use crate::config::settings::AppConfig;
use crate::loader::load_queries;
use crate::prediction::Prediction;
use crate::recommender::{BatchPrediction, Recommender};
use crate::services::DataSources;

/// Value written for pairs that could not be predicted
const NOT_COMPUTABLE_MARKER: &str = "-1";

pub struct BatchPredictionService {
    config: AppConfig,
    sources: DataSources,
    queries: PathBuf,
    output: PathBuf,
}

impl BatchPredictionService {
    pub fn new(config: AppConfig, sources: DataSources, queries: PathBuf, output: PathBuf) -> Self {
        Self {
            config,
            sources,
            queries,
            output,
        }
    }

    pub fn run(&self) -> Result<usize> {
        info!("=== Starting Batch Prediction ===");

        info!("Step 1: Loading ratings and queries...");
        let matrix = self.sources.load()?;
        let queries = load_queries(&self.queries)?;

        info!("Step 2: Predicting {} queries...", queries.len());
        let recommender = Recommender::new(matrix, self.config.recommender.clone())?;
        let predictions = recommender.predict_batch(&queries)?;
        let predicted = predictions
            .iter()
            .filter(|p| p.prediction.is_predicted())
            .count();
        info!("  → {} of {} queries predicted", predicted, predictions.len());

        info!("Step 3: Writing predictions...");
        write_predictions(&self.output, &predictions)?;
        info!("  → Saved to {}", self.output.display());

        info!("=== Batch Prediction Complete ===");
        Ok(predictions.len())
    }
}

/// Write one `user<TAB>item<TAB>value` line per prediction
pub fn write_predictions(path: &Path, predictions: &[BatchPrediction]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| crate::errors::write_context("predictions", &path.display().to_string()))?;
    let mut writer = BufWriter::new(file);

    for prediction in predictions {
        writeln!(writer, "{}", format_line(prediction))?;
    }
    writer.flush()?;
    Ok(())
}

fn format_line(batch: &BatchPrediction) -> String {
    let value = match batch.prediction {
        Prediction::Predicted(value) => value.to_string(),
        Prediction::NotComputable(_) => NOT_COMPUTABLE_MARKER.to_string(),
    };
    format!("{}\t{}\t{}", batch.user, batch.item, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::NotComputableReason;
    use crate::services::fixtures::{sources, temp_file};
    use tempfile::NamedTempFile;

    #[test]
    fn test_format_line() {
        let predicted = BatchPrediction {
            user: "7".to_string(),
            item: "Heat (1995)".to_string(),
            prediction: Prediction::Predicted(3.5),
        };
        let missing = BatchPrediction {
            user: "7".to_string(),
            item: "x".to_string(),
            prediction: Prediction::NotComputable(NotComputableReason::InsufficientNeighbors),
        };

        assert_eq!(format_line(&predicted), "7\tHeat (1995)\t3.5");
        assert_eq!(format_line(&missing), "7\tx\t-1");
    }

    #[test]
    fn test_run_writes_one_line_per_query() {
        let (sources, _ratings, _items) = sources();
        let queries = temp_file("A\tw\nA\tx\nZ\tx\n");
        let output = NamedTempFile::new().unwrap();

        let service = BatchPredictionService::new(
            AppConfig::new(),
            sources,
            queries.path().to_path_buf(),
            output.path().to_path_buf(),
        );
        assert_eq!(service.run().unwrap(), 3);

        let written = std::fs::read_to_string(output.path()).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("A\tw\t"));
        assert_ne!(lines[0], "A\tw\t-1");
        assert_eq!(lines[1], "A\tx\t-1");
        assert_eq!(lines[2], "Z\tx\t-1");
    }
}
