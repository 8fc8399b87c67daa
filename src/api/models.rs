use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{
    Achievement, BettingPlayerStats, BettingRankingEntry, LeagueTableEntry, Tournament,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentSummary {
    pub id: i64,
    pub name: String,
    pub status: String,
}

impl From<&Tournament> for TournamentSummary {
    fn from(t: &Tournament) -> Self {
        Self {
            id: t.id,
            name: t.name.clone(),
            status: t.status.as_str().to_string(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingRow {
    pub position: u32,
    pub player_id: i64,
    pub nickname: String,
    pub matches_played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,
    pub points: u32,
}

impl From<LeagueTableEntry> for StandingRow {
    fn from(e: LeagueTableEntry) -> Self {
        Self {
            position: e.position,
            player_id: e.player_id,
            nickname: e.nickname,
            matches_played: e.matches_played,
            wins: e.wins,
            draws: e.draws,
            losses: e.losses,
            goals_for: e.goals_for,
            goals_against: e.goals_against,
            goal_difference: e.goal_difference,
            points: e.points,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementItem {
    pub player_id: i64,
    pub achievement_type: String,
    pub rank: Option<u8>,
    pub title: String,
    pub description: String,
    pub value: Option<f64>,
    pub awarded_at: DateTime<Utc>,
}

impl From<Achievement> for AchievementItem {
    fn from(a: Achievement) -> Self {
        Self {
            player_id: a.player_id,
            achievement_type: a.achievement_type.as_str().to_string(),
            rank: a.achievement_rank,
            title: a.title,
            description: a.description,
            value: a.value,
            awarded_at: a.awarded_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsResponse {
    pub tournament: TournamentSummary,
    pub standings: Vec<StandingRow>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementsResponse {
    pub tournament: TournamentSummary,
    pub achievements: Vec<AchievementItem>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub tournament: TournamentSummary,
    pub resolved: bool,
    pub standings: Vec<StandingRow>,
    pub achievements: Vec<AchievementItem>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardItem {
    pub position: u32,
    pub player_id: i64,
    pub nickname: String,
    pub total_points: u32,
    pub accuracy_percentage: f64,
    pub total_coupons: u32,
    pub best_coupon_score: u32,
    pub gambling_king_count: u32,
    pub dark_horse_count: u32,
}

impl From<BettingRankingEntry> for LeaderboardItem {
    fn from(e: BettingRankingEntry) -> Self {
        Self {
            position: e.position,
            player_id: e.player_id,
            nickname: e.nickname,
            total_points: e.total_points,
            accuracy_percentage: e.accuracy_percentage,
            total_coupons: e.total_coupons,
            best_coupon_score: e.best_coupon_score,
            gambling_king_count: e.gambling_king_count,
            dark_horse_count: e.dark_horse_count,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub items: Vec<LeaderboardItem>,
    pub total: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerBettingStats {
    pub player_id: i64,
    pub nickname: String,
    pub total_coupons: u32,
    pub total_points: u32,
    pub correct_predictions: u32,
    pub total_predictions: u32,
    pub accuracy_percentage: f64,
    pub best_coupon_score: u32,
    pub gambling_king_count: u32,
    pub dark_horse_count: u32,
}

impl PlayerBettingStats {
    pub fn new(nickname: String, s: BettingPlayerStats) -> Self {
        Self {
            player_id: s.player_id,
            nickname,
            total_coupons: s.total_coupons,
            total_points: s.total_points,
            correct_predictions: s.correct_predictions,
            total_predictions: s.total_predictions,
            accuracy_percentage: s.accuracy_percentage,
            best_coupon_score: s.best_coupon_score,
            gambling_king_count: s.gambling_king_count,
            dark_horse_count: s.dark_horse_count,
        }
    }
}
