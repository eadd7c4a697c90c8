pub mod settings;

pub use settings::{AppConfig, EvaluationSettings, RecommenderSettings};
