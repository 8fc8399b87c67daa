use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::models::{
    BettingCoupon, BettingPrediction, BettingPredictionType, Match, Player, Roster, Tournament,
};
use crate::errors::EngineError;

/// A coupon together with its predictions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponSnapshot {
    pub coupon: BettingCoupon,
    #[serde(default)]
    pub predictions: Vec<BettingPrediction>,
}

/// Complete input set for one tournament, as exchanged in JSON files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentSnapshot {
    pub tournament: Tournament,
    pub players: Vec<Player>,
    #[serde(default)]
    pub matches: Vec<Match>,
    #[serde(default)]
    pub catalog: Vec<BettingPredictionType>,
    #[serde(default)]
    pub coupons: Vec<CouponSnapshot>,
}

impl TournamentSnapshot {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let snapshot: Self = serde_json::from_str(&json).with_context(|| {
            format!(
                "Failed to parse snapshot {}. First 200 chars: {}",
                path.display(),
                json.chars().take(200).collect::<String>()
            )
        })?;
        info!("Loaded snapshot from {}", path.display());
        Ok(snapshot)
    }

    pub fn roster(&self) -> Roster {
        Roster::new(self.players.iter().cloned())
    }

    /// Rejects matches and coupons that point at another tournament or at
    /// players missing from the snapshot.
    pub fn validate(&self) -> Result<(), EngineError> {
        let roster = self.roster();
        let tournament_id = self.tournament.id;

        for m in &self.matches {
            if m.tournament_id != tournament_id {
                return Err(EngineError::MixedTournaments {
                    expected: tournament_id,
                    found: m.tournament_id,
                });
            }
            m.validate()?;
            roster.nickname(m.player1_id)?;
            roster.nickname(m.player2_id)?;
        }

        for entry in &self.coupons {
            if entry.coupon.tournament_id != tournament_id {
                return Err(EngineError::MixedTournaments {
                    expected: tournament_id,
                    found: entry.coupon.tournament_id,
                });
            }
            roster.nickname(entry.coupon.player_id)?;
            for p in &entry.predictions {
                if p.coupon_id != entry.coupon.id {
                    return Err(EngineError::CouponMismatch {
                        prediction_id: p.id,
                        expected: entry.coupon.id,
                        actual: p.coupon_id,
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TournamentStatus;

    fn snapshot() -> TournamentSnapshot {
        TournamentSnapshot {
            tournament: Tournament {
                id: 1,
                name: "Spring Cup".to_string(),
                status: TournamentStatus::Active,
            },
            players: vec![
                Player { id: 1, nickname: "ana".to_string() },
                Player { id: 2, nickname: "bob".to_string() },
            ],
            matches: vec![Match {
                id: 10,
                tournament_id: 1,
                player1_id: 1,
                player2_id: 2,
                team1_id: None,
                team2_id: None,
                player1_score: Some(1),
                player2_score: Some(0),
                is_completed: true,
            }],
            catalog: Vec::new(),
            coupons: Vec::new(),
        }
    }

    #[test]
    fn test_parses_minimal_json() {
        let raw = r#"{
            "tournament": {"id": 3, "name": "Cup", "status": "completed"},
            "players": [{"id": 1, "nickname": "ana"}]
        }"#;
        let parsed: TournamentSnapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.tournament.status, TournamentStatus::Completed);
        assert!(parsed.matches.is_empty());
        assert!(parsed.coupons.is_empty());
    }

    #[test]
    fn test_validate_rejects_foreign_match() {
        let mut snap = snapshot();
        snap.matches[0].tournament_id = 99;
        assert_eq!(
            snap.validate(),
            Err(EngineError::MixedTournaments { expected: 1, found: 99 })
        );
    }

    #[test]
    fn test_validate_rejects_unknown_player() {
        let mut snap = snapshot();
        snap.matches[0].player2_id = 7;
        assert_eq!(snap.validate(), Err(EngineError::UnknownPlayer(7)));
    }

    #[test]
    fn test_validate_accepts_consistent_snapshot() {
        assert!(snapshot().validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("snapshot-{}.json", std::process::id()));
        fs::write(&path, serde_json::to_string(&snapshot()).unwrap()).unwrap();
        let loaded = TournamentSnapshot::load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(loaded.tournament, snapshot().tournament);
        assert_eq!(loaded.matches, snapshot().matches);
    }

    #[test]
    fn test_load_reports_bad_json() {
        let path = std::env::temp_dir().join(format!("broken-{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();
        let err = TournamentSnapshot::load(&path).unwrap_err();
        fs::remove_file(&path).unwrap();

        assert!(format!("{:#}", err).contains("First 200 chars"));
    }

    #[test]
    fn test_load_error_excerpt_keeps_multibyte_chars_whole() {
        let path = std::env::temp_dir().join(format!("polish-{}.json", std::process::id()));
        let broken = format!("{{{}Łukasz", " ".repeat(198));
        fs::write(&path, &broken).unwrap();
        let err = TournamentSnapshot::load(&path).unwrap_err();
        fs::remove_file(&path).unwrap();

        let message = format!("{:#}", err);
        assert!(message.contains("First 200 chars"));
        assert!(message.contains('Ł'));
    }
}
