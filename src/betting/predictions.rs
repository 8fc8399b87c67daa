use serde::{Deserialize, Serialize};

use crate::domain::{AchievementType, BettingPrediction, PlayerId};
use crate::errors::{EngineError, EngineResult};

/// Catalog keys the scorer knows how to evaluate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionKind {
    FinalRanking,
    TournamentWinner,
    TopScorer,
    DefensiveLeader,
    MostConceded,
    KingOfEmotions,
    TotalGoals,
}

impl PredictionKind {
    pub const ALL: [PredictionKind; 7] = [
        PredictionKind::FinalRanking,
        PredictionKind::TournamentWinner,
        PredictionKind::TopScorer,
        PredictionKind::DefensiveLeader,
        PredictionKind::MostConceded,
        PredictionKind::KingOfEmotions,
        PredictionKind::TotalGoals,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            PredictionKind::FinalRanking => "final_ranking",
            PredictionKind::TournamentWinner => "tournament_winner",
            PredictionKind::TopScorer => "top_scorer",
            PredictionKind::DefensiveLeader => "defensive_leader",
            PredictionKind::MostConceded => "most_conceded",
            PredictionKind::KingOfEmotions => "king_of_emotions",
            PredictionKind::TotalGoals => "total_goals",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.key() == key)
    }

    /// Achievement whose holders decide single-player predictions
    pub fn achievement(&self) -> Option<AchievementType> {
        match self {
            PredictionKind::TournamentWinner => Some(AchievementType::TournamentWinner),
            PredictionKind::TopScorer => Some(AchievementType::TopScorer),
            PredictionKind::DefensiveLeader => Some(AchievementType::DefensiveLeader),
            PredictionKind::MostConceded => Some(AchievementType::MostConceded),
            PredictionKind::KingOfEmotions => Some(AchievementType::KingOfEmotions),
            PredictionKind::FinalRanking | PredictionKind::TotalGoals => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverUnder {
    Over,
    Under,
}

/// Strongly typed prediction payload
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionValue {
    /// Predicted top-N order, first element is the predicted winner
    FinalRanking(Vec<PlayerId>),
    /// Achievement-backed single player pick
    Player(PredictionKind, PlayerId),
    /// Tournament total goals against a line
    TotalGoals { line: f64, side: OverUnder },
}

#[derive(Deserialize)]
struct TotalGoalsPayload {
    line: f64,
    side: OverUnder,
}

impl PredictionValue {
    /// Decodes a stored prediction. Unknown keys and payloads that do not fit
    /// the key are input-contract violations.
    pub fn decode(prediction: &BettingPrediction) -> EngineResult<(PredictionKind, Self)> {
        let kind = PredictionKind::from_key(&prediction.prediction_type).ok_or_else(|| {
            EngineError::UnknownPredictionType {
                prediction_id: prediction.id,
                key: prediction.prediction_type.clone(),
            }
        })?;

        let raw = prediction.prediction_value.trim();
        let malformed = |reason: String| EngineError::MalformedPrediction {
            prediction_id: prediction.id,
            key: kind.key().to_string(),
            reason,
        };

        let value = match kind {
            PredictionKind::FinalRanking => {
                let ids: Vec<PlayerId> =
                    serde_json::from_str(raw).map_err(|e| malformed(e.to_string()))?;
                if ids.is_empty() {
                    return Err(malformed("empty ranking".to_string()));
                }
                if has_duplicates(&ids) {
                    return Err(malformed("player listed twice".to_string()));
                }
                PredictionValue::FinalRanking(ids)
            }
            PredictionKind::TotalGoals => {
                let payload: TotalGoalsPayload =
                    serde_json::from_str(raw).map_err(|e| malformed(e.to_string()))?;
                if !payload.line.is_finite() || payload.line < 0.0 {
                    return Err(malformed(format!("invalid line {}", payload.line)));
                }
                PredictionValue::TotalGoals {
                    line: payload.line,
                    side: payload.side,
                }
            }
            single => {
                let id = parse_player_id(raw)
                    .ok_or_else(|| malformed(format!("'{}' is not a player id", raw)))?;
                PredictionValue::Player(single, id)
            }
        };

        Ok((kind, value))
    }
}

/// Accepts a bare integer, a quoted integer, or `{"player_id": n}`
fn parse_player_id(raw: &str) -> Option<PlayerId> {
    if let Ok(id) = raw.parse::<PlayerId>() {
        return Some(id);
    }
    match serde_json::from_str::<serde_json::Value>(raw).ok()? {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        serde_json::Value::Object(map) => map.get("player_id")?.as_i64(),
        _ => None,
    }
}

fn has_duplicates(ids: &[PlayerId]) -> bool {
    let mut sorted = ids.to_vec();
    sorted.sort_unstable();
    sorted.windows(2).any(|w| w[0] == w[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(key: &str, value: &str) -> BettingPrediction {
        BettingPrediction {
            id: 1,
            coupon_id: 1,
            prediction_type: key.to_string(),
            prediction_value: value.to_string(),
            points_awarded: 0,
            is_correct: None,
        }
    }

    #[test]
    fn test_decode_single_player_variants() {
        for raw in ["7", "\"7\"", "{\"player_id\": 7}", " 7 "] {
            let (kind, value) = PredictionValue::decode(&prediction("top_scorer", raw)).unwrap();
            assert_eq!(kind, PredictionKind::TopScorer);
            assert_eq!(value, PredictionValue::Player(PredictionKind::TopScorer, 7));
        }
    }

    #[test]
    fn test_decode_ranking() {
        let (_, value) = PredictionValue::decode(&prediction("final_ranking", "[3, 1, 2]")).unwrap();
        assert_eq!(value, PredictionValue::FinalRanking(vec![3, 1, 2]));
    }

    #[test]
    fn test_decode_total_goals() {
        let raw = r#"{"line": 10.5, "side": "under"}"#;
        let (_, value) = PredictionValue::decode(&prediction("total_goals", raw)).unwrap();
        assert_eq!(
            value,
            PredictionValue::TotalGoals { line: 10.5, side: OverUnder::Under }
        );
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = PredictionValue::decode(&prediction("first_red_card", "1")).unwrap_err();
        assert!(matches!(err, EngineError::UnknownPredictionType { .. }));
    }

    #[test]
    fn test_malformed_payloads_rejected() {
        let cases = [
            ("final_ranking", "[]"),
            ("final_ranking", "[1, 1]"),
            ("final_ranking", "1"),
            ("tournament_winner", "ana"),
            ("total_goals", r#"{"line": -1, "side": "over"}"#),
        ];
        for (key, raw) in cases {
            let err = PredictionValue::decode(&prediction(key, raw)).unwrap_err();
            assert!(
                matches!(err, EngineError::MalformedPrediction { .. }),
                "{} {} should be malformed",
                key,
                raw
            );
        }
    }
}
