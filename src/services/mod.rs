pub mod import;
pub mod locks;
pub mod recompute;
pub mod server;

pub use import::{ImportService, ImportSummary};
pub use locks::TournamentLocks;
pub use recompute::{RecomputeService, RecomputeSummary, TournamentPreview};
pub use server::ServerService;
