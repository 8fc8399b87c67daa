use thiserror::Error;

use crate::domain::{CouponId, MatchId, PlayerId, PredictionId, TournamentId};

/// Input-contract violations raised by the scoring engine.
///
/// Empty inputs are never errors; they produce empty results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Match {match_id} pairs player {player_id} against themselves")]
    SamePlayer { match_id: MatchId, player_id: PlayerId },

    #[error("Match {match_id} is marked completed but is missing a score")]
    MissingScore { match_id: MatchId },

    #[error("Match {match_id} has scores that disagree with its completion flag")]
    InconsistentScores { match_id: MatchId },

    #[error("Match {match_id} has a negative score")]
    NegativeScore { match_id: MatchId },

    #[error("Player {0} is not in the roster")]
    UnknownPlayer(PlayerId),

    #[error("Prediction {prediction_id} uses unknown prediction type '{key}'")]
    UnknownPredictionType { prediction_id: PredictionId, key: String },

    #[error("Prediction {prediction_id} has a malformed '{key}' value: {reason}")]
    MalformedPrediction {
        prediction_id: PredictionId,
        key: String,
        reason: String,
    },

    #[error("Prediction {prediction_id} belongs to coupon {actual}, not coupon {expected}")]
    CouponMismatch {
        prediction_id: PredictionId,
        expected: CouponId,
        actual: CouponId,
    },

    #[error("Tournament {0} still has unfinished matches")]
    TournamentNotResolved(TournamentId),

    #[error("Expected data for tournament {expected} but found tournament {found}")]
    MixedTournaments {
        expected: TournamentId,
        found: TournamentId,
    },
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Context message for failed repository reads
pub fn fetch_context(entity: &str, tournament_id: TournamentId) -> String {
    format!("Failed to fetch {} for tournament {}", entity, tournament_id)
}

/// Context message for failed derived-row replacement
pub fn replace_context(entity: &str, tournament_id: TournamentId) -> String {
    format!("Failed to replace {} for tournament {}", entity, tournament_id)
}
