use anyhow::Result;
use colored::Colorize;

use crate::config::settings::AppConfig;
use crate::domain::RatingMatrix;
use crate::neighborhood::Neighbor;
use crate::prediction::{Prediction, RecommendedItem};
use crate::recommender::Recommender;
use crate::services::DataSources;

/// Interactive queries against a loaded rating matrix
pub struct QueryService {
    recommender: Recommender,
}

impl QueryService {
    pub fn new(config: AppConfig, sources: &DataSources) -> Result<Self> {
        let matrix = sources.load()?;
        let recommender = Recommender::new(matrix, config.recommender)?;
        Ok(Self { recommender })
    }

    pub fn predict(&self, user: &str, item: &str) -> Result<Prediction> {
        let prediction = self.recommender.predict(user, item)?;

        match prediction {
            Prediction::Predicted(value) => {
                println!("{} on {}: {}", user, item, format!("{:.4}", value).green());
            }
            Prediction::NotComputable(reason) => {
                println!(
                    "{} on {}: {}",
                    user,
                    item,
                    format!("not computable ({})", reason.as_str()).yellow()
                );
            }
        }
        Ok(prediction)
    }

    pub fn neighbors(&self, user: &str, size: Option<usize>) -> Result<Vec<Neighbor>> {
        let neighbors = match size {
            Some(size) => self.recommender.neighbors_with_size(user, size)?,
            None => self.recommender.neighbors(user)?,
        };

        if neighbors.is_empty() {
            println!("{}", format!("No positively similar users for {}", user).yellow());
        }
        for (rank, neighbor) in neighbors.iter().enumerate() {
            println!("{:>4}. {:<12} {:.4}", rank + 1, neighbor.user, neighbor.similarity);
        }
        Ok(neighbors)
    }

    pub fn recommend(&self, user: &str, limit: usize) -> Result<Vec<RecommendedItem>> {
        let items = self.recommender.recommend(user, limit)?;

        if items.is_empty() {
            println!("{}", format!("No recommendations for {}", user).yellow());
        }
        for (rank, item) in items.iter().enumerate() {
            println!(
                "{:>4}. {} {} ({} neighbors)",
                rank + 1,
                format!("{:.3}", item.score).green(),
                item.item,
                item.support
            );
        }
        Ok(items)
    }
}

pub fn print_stats(matrix: &RatingMatrix) {
    println!("{}", "Rating matrix".bold());
    println!("  Users:   {}", matrix.num_users());
    println!("  Items:   {}", matrix.num_items());
    println!("  Ratings: {}", matrix.num_ratings());
}
