pub mod evaluator;

pub use evaluator::{evaluate_achievements, evaluate_achievements_at};
