pub mod outcome;
pub mod predictions;
pub mod scorer;

pub use outcome::RealizedOutcome;
pub use predictions::{OverUnder, PredictionKind, PredictionValue};
pub use scorer::{ensure_resolved, score_coupon, score_coupon_against, unscorable_types};
