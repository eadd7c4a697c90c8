pub mod batch;
pub mod evaluation;
pub mod query;

use std::path::PathBuf;

use anyhow::Result;

use crate::domain::RatingMatrix;
use crate::loader::{load_catalog, load_ratings};

/// Ratings file plus the item catalog used to name its items
#[derive(Debug, Clone)]
pub struct DataSources {
    pub ratings: PathBuf,
    pub items: PathBuf,
}

impl DataSources {
    pub fn new(ratings: impl Into<PathBuf>, items: impl Into<PathBuf>) -> Self {
        Self {
            ratings: ratings.into(),
            items: items.into(),
        }
    }

    pub fn load(&self) -> Result<RatingMatrix> {
        let catalog = load_catalog(&self.items)?;
        load_ratings(&self.ratings, &catalog)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::sources;

    #[test]
    fn test_load_names_items() {
        let (sources, _ratings, _items) = sources();
        let matrix = sources.load().unwrap();

        assert_eq!(matrix.num_users(), 3);
        assert_eq!(matrix.num_items(), 4);
        assert_eq!(matrix.get("B", "w"), Some(4.0));
    }
}
