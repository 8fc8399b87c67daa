pub mod models;
pub mod snapshot;

pub use models::*;
pub use snapshot::TournamentSnapshot;
