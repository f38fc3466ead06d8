pub mod config;
pub mod engine;
pub mod signals;
pub mod validation;

pub use config::*;
pub use engine::{calculate_score, ScoreResult};
pub use signals::{parse_optional_numeric, parse_revenue, RatingSignals};
pub use validation::validate_scoring;
