mod catalog;
mod matrix;
pub mod models;

pub use catalog::ItemCatalog;
pub use matrix::RatingMatrix;
pub use models::*;
