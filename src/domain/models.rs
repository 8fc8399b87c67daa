use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

pub type PlayerId = i64;
pub type TournamentId = i64;
pub type TeamId = i64;
pub type MatchId = i64;
pub type CouponId = i64;
pub type PredictionId = i64;

/// Registered player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub nickname: String,
}

/// Player lookup used wherever output needs a nickname
#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: HashMap<PlayerId, Player>,
}

impl Roster {
    pub fn new(players: impl IntoIterator<Item = Player>) -> Self {
        Self {
            players: players.into_iter().map(|p| (p.id, p)).collect(),
        }
    }

    pub fn nickname(&self, id: PlayerId) -> Result<&str, EngineError> {
        self.players
            .get(&id)
            .map(|p| p.nickname.as_str())
            .ok_or(EngineError::UnknownPlayer(id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    Upcoming,
    Active,
    Completed,
}

impl TournamentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TournamentStatus::Upcoming => "upcoming",
            TournamentStatus::Active => "active",
            TournamentStatus::Completed => "completed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "upcoming" => Some(TournamentStatus::Upcoming),
            "active" => Some(TournamentStatus::Active),
            "completed" => Some(TournamentStatus::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub status: TournamentStatus,
}

/// Match between two players, each playing with an assigned team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub team1_id: Option<TeamId>,
    pub team2_id: Option<TeamId>,
    pub player1_score: Option<i32>,
    pub player2_score: Option<i32>,
    pub is_completed: bool,
}

impl Match {
    /// Checks the record invariants: distinct players, scores both present or
    /// both absent, non-negative, and `is_completed` exactly when scored.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.player1_id == self.player2_id {
            return Err(EngineError::SamePlayer {
                match_id: self.id,
                player_id: self.player1_id,
            });
        }

        match (self.player1_score, self.player2_score) {
            (Some(a), Some(b)) => {
                if a < 0 || b < 0 {
                    return Err(EngineError::NegativeScore { match_id: self.id });
                }
                if !self.is_completed {
                    return Err(EngineError::InconsistentScores { match_id: self.id });
                }
            }
            (None, None) => {
                if self.is_completed {
                    return Err(EngineError::MissingScore { match_id: self.id });
                }
            }
            _ => {
                return Err(if self.is_completed {
                    EngineError::MissingScore { match_id: self.id }
                } else {
                    EngineError::InconsistentScores { match_id: self.id }
                });
            }
        }

        Ok(())
    }

    /// Final score as `(player1_goals, player2_goals)`, `None` until completed
    pub fn outcome(&self) -> Result<Option<(u32, u32)>, EngineError> {
        if !self.is_completed {
            return Ok(None);
        }
        self.validate()?;
        match (self.player1_score, self.player2_score) {
            (Some(a), Some(b)) => Ok(Some((a as u32, b as u32))),
            _ => Err(EngineError::MissingScore { match_id: self.id }),
        }
    }
}

/// One row of a tournament's league table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueTableEntry {
    pub tournament_id: TournamentId,
    pub player_id: PlayerId,
    pub nickname: String,
    pub matches_played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,
    pub points: u32,
    pub position: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementType {
    TournamentWinner,
    TopScorer,
    DefensiveLeader,
    MostConceded,
    KingOfEmotions,
}

impl AchievementType {
    pub const ALL: [AchievementType; 5] = [
        AchievementType::TournamentWinner,
        AchievementType::TopScorer,
        AchievementType::DefensiveLeader,
        AchievementType::MostConceded,
        AchievementType::KingOfEmotions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementType::TournamentWinner => "tournament_winner",
            AchievementType::TopScorer => "top_scorer",
            AchievementType::DefensiveLeader => "defensive_leader",
            AchievementType::MostConceded => "most_conceded",
            AchievementType::KingOfEmotions => "king_of_emotions",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == raw)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub player_id: PlayerId,
    pub tournament_id: Option<TournamentId>,
    pub achievement_type: AchievementType,
    pub achievement_rank: Option<u8>,
    pub title: String,
    pub description: String,
    pub value: Option<f64>,
    pub awarded_at: DateTime<Utc>,
}

impl Achievement {
    /// Equality that ignores `awarded_at`
    pub fn same_award(&self, other: &Achievement) -> bool {
        self.player_id == other.player_id
            && self.tournament_id == other.tournament_id
            && self.achievement_type == other.achievement_type
            && self.achievement_rank == other.achievement_rank
            && self.title == other.title
            && self.description == other.description
            && self.value == other.value
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BettingCoupon {
    pub id: CouponId,
    pub tournament_id: TournamentId,
    pub player_id: PlayerId,
    pub name: String,
    pub is_submitted: bool,
    pub total_points: u32,
}

/// Stored prediction; `prediction_value` is the raw payload whose shape
/// depends on `prediction_type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BettingPrediction {
    pub id: PredictionId,
    pub coupon_id: CouponId,
    pub prediction_type: String,
    pub prediction_value: String,
    pub points_awarded: u32,
    pub is_correct: Option<bool>,
}

/// Catalog entry describing one prediction kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BettingPredictionType {
    pub key: String,
    pub display_name: String,
    pub points_for_correct: u32,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCoupon {
    pub coupon: BettingCoupon,
    pub predictions: Vec<BettingPrediction>,
    pub total_points: u32,
}

impl ScoredCoupon {
    pub fn correct_predictions(&self) -> u32 {
        self.predictions
            .iter()
            .filter(|p| p.is_correct == Some(true))
            .count() as u32
    }

    pub fn total_predictions(&self) -> u32 {
        self.predictions.len() as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BettingAchievementType {
    GamblingKing,
    DarkHorse,
    PerfectPredictor,
}

impl BettingAchievementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BettingAchievementType::GamblingKing => "gambling_king",
            BettingAchievementType::DarkHorse => "dark_horse",
            BettingAchievementType::PerfectPredictor => "perfect_predictor",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "gambling_king" => Some(BettingAchievementType::GamblingKing),
            "dark_horse" => Some(BettingAchievementType::DarkHorse),
            "perfect_predictor" => Some(BettingAchievementType::PerfectPredictor),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BettingAchievement {
    pub tournament_id: TournamentId,
    pub player_id: PlayerId,
    pub coupon_id: CouponId,
    pub achievement_type: BettingAchievementType,
    pub points_earned: u32,
}

/// Lifetime betting aggregate for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BettingPlayerStats {
    pub player_id: PlayerId,
    pub total_coupons: u32,
    pub total_points: u32,
    pub correct_predictions: u32,
    pub total_predictions: u32,
    pub accuracy_percentage: f64,
    pub best_coupon_score: u32,
    pub gambling_king_count: u32,
    pub dark_horse_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BettingRankingEntry {
    pub position: u32,
    pub player_id: PlayerId,
    pub nickname: String,
    pub total_points: u32,
    pub accuracy_percentage: f64,
    pub total_coupons: u32,
    pub best_coupon_score: u32,
    pub gambling_king_count: u32,
    pub dark_horse_count: u32,
}
