pub mod aggregator;
pub mod awards;
pub mod stats;

pub use aggregator::aggregate_rankings;
pub use awards::{derive_betting_achievements, AwardRules, ContrarianWinnerPick, DarkHorsePolicy};
pub use stats::{accuracy_percentage, compute_player_stats};
