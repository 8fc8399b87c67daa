use std::collections::{HashMap, HashSet};

use super::predictions::{OverUnder, PredictionKind, PredictionValue};
use crate::domain::{Achievement, AchievementType, LeagueTableEntry, PlayerId, TournamentId};
use crate::errors::{EngineError, EngineResult};
use crate::standings::is_sporting_tie;

/// Ground truth a coupon is scored against, built once per tournament
#[derive(Debug, Clone)]
pub struct RealizedOutcome {
    tournament_id: TournamentId,
    ranking: Vec<PlayerId>,
    winners: HashSet<PlayerId>,
    holders: HashMap<AchievementType, HashSet<PlayerId>>,
    total_goals: u32,
}

impl RealizedOutcome {
    /// Fails when a table row or achievement belongs to another tournament
    pub fn new(
        tournament_id: TournamentId,
        table: &[LeagueTableEntry],
        achievements: &[Achievement],
    ) -> EngineResult<Self> {
        let foreign = table
            .iter()
            .map(|e| e.tournament_id)
            .chain(achievements.iter().filter_map(|a| a.tournament_id))
            .find(|&id| id != tournament_id);
        if let Some(found) = foreign {
            return Err(EngineError::MixedTournaments {
                expected: tournament_id,
                found,
            });
        }

        let mut ordered: Vec<&LeagueTableEntry> = table.iter().collect();
        ordered.sort_by_key(|e| e.position);

        let ranking = ordered.iter().map(|e| e.player_id).collect();

        let mut holders: HashMap<AchievementType, HashSet<PlayerId>> = HashMap::new();
        for a in achievements {
            // Only the champion counts for tournament_winner, not the podium
            if a.achievement_type == AchievementType::TournamentWinner && a.achievement_rank != Some(1) {
                continue;
            }
            holders.entry(a.achievement_type).or_default().insert(a.player_id);
        }

        let mut winners: HashSet<PlayerId> = match ordered.first() {
            Some(leader) => ordered
                .iter()
                .take_while(|e| is_sporting_tie(leader, e))
                .map(|e| e.player_id)
                .collect(),
            None => HashSet::new(),
        };
        if let Some(champions) = holders.get(&AchievementType::TournamentWinner) {
            winners.extend(champions);
        }

        Ok(Self {
            tournament_id,
            ranking,
            winners,
            holders,
            total_goals: table.iter().map(|e| e.goals_for).sum(),
        })
    }

    pub fn tournament_id(&self) -> TournamentId {
        self.tournament_id
    }

    pub fn is_winner(&self, player_id: PlayerId) -> bool {
        self.winners.contains(&player_id)
    }

    pub fn holds(&self, achievement: AchievementType, player_id: PlayerId) -> bool {
        self.holders
            .get(&achievement)
            .is_some_and(|set| set.contains(&player_id))
    }
}

pub type Comparator = fn(&PredictionValue, &RealizedOutcome) -> bool;

/// Dispatch table from prediction kind to its correctness test
pub fn comparator(kind: PredictionKind) -> Comparator {
    match kind {
        PredictionKind::FinalRanking => ranking_matches,
        PredictionKind::TournamentWinner => winner_matches,
        PredictionKind::TopScorer
        | PredictionKind::DefensiveLeader
        | PredictionKind::MostConceded
        | PredictionKind::KingOfEmotions => holder_matches,
        PredictionKind::TotalGoals => total_goals_matches,
    }
}

fn ranking_matches(value: &PredictionValue, outcome: &RealizedOutcome) -> bool {
    let PredictionValue::FinalRanking(predicted) = value else {
        return false;
    };
    outcome.ranking.len() >= predicted.len() && outcome.ranking[..predicted.len()] == predicted[..]
}

fn winner_matches(value: &PredictionValue, outcome: &RealizedOutcome) -> bool {
    match value {
        PredictionValue::Player(_, id) => outcome.is_winner(*id),
        _ => false,
    }
}

fn holder_matches(value: &PredictionValue, outcome: &RealizedOutcome) -> bool {
    match value {
        PredictionValue::Player(kind, id) => kind
            .achievement()
            .is_some_and(|achievement| outcome.holds(achievement, *id)),
        _ => false,
    }
}

fn total_goals_matches(value: &PredictionValue, outcome: &RealizedOutcome) -> bool {
    let PredictionValue::TotalGoals { line, side } = value else {
        return false;
    };
    let total = outcome.total_goals as f64;
    match side {
        OverUnder::Over => total > *line,
        OverUnder::Under => total < *line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(player_id: PlayerId, position: u32, points: u32, gd: i64, gf: u32) -> LeagueTableEntry {
        LeagueTableEntry {
            tournament_id: 1,
            player_id,
            nickname: format!("p{}", player_id),
            matches_played: 2,
            wins: 0,
            draws: 0,
            losses: 0,
            goals_for: gf,
            goals_against: (gf as i64 - gd) as u32,
            goal_difference: gd,
            points,
            position,
        }
    }

    fn award(player_id: PlayerId, kind: AchievementType, rank: Option<u8>) -> Achievement {
        Achievement {
            player_id,
            tournament_id: Some(1),
            achievement_type: kind,
            achievement_rank: rank,
            title: String::new(),
            description: String::new(),
            value: None,
            awarded_at: Utc::now(),
        }
    }

    #[test]
    fn test_sporting_tie_for_first_counts_as_winner() {
        let table = vec![entry(1, 1, 4, 2, 5), entry(2, 2, 4, 2, 5), entry(3, 3, 0, -4, 1)];
        let awards = vec![award(1, AchievementType::TournamentWinner, Some(1))];
        let outcome = RealizedOutcome::new(1, &table, &awards).unwrap();
        assert!(outcome.is_winner(1));
        assert!(outcome.is_winner(2));
        assert!(!outcome.is_winner(3));
    }

    #[test]
    fn test_runner_up_is_not_a_winner() {
        let table = vec![entry(1, 1, 6, 3, 5), entry(2, 2, 3, 0, 3)];
        let awards = vec![
            award(1, AchievementType::TournamentWinner, Some(1)),
            award(2, AchievementType::TournamentWinner, Some(2)),
        ];
        let outcome = RealizedOutcome::new(1, &table, &awards).unwrap();
        assert!(!outcome.holds(AchievementType::TournamentWinner, 2));
        assert!(!outcome.is_winner(2));
    }

    #[test]
    fn test_ranking_prefix() {
        let table = vec![entry(2, 2, 3, 0, 3), entry(1, 1, 6, 3, 5), entry(3, 3, 0, -3, 0)];
        let outcome = RealizedOutcome::new(1, &table, &[]).unwrap();
        let check = comparator(PredictionKind::FinalRanking);
        assert!(check(&PredictionValue::FinalRanking(vec![1, 2]), &outcome));
        assert!(!check(&PredictionValue::FinalRanking(vec![2, 1]), &outcome));
        assert!(!check(&PredictionValue::FinalRanking(vec![1, 2, 3, 4]), &outcome));
    }

    #[test]
    fn test_total_goals_line_is_strict() {
        let table = vec![entry(1, 1, 3, 1, 2), entry(2, 2, 0, -1, 1)];
        let outcome = RealizedOutcome::new(1, &table, &[]).unwrap();
        let check = comparator(PredictionKind::TotalGoals);
        let over = |line| PredictionValue::TotalGoals { line, side: OverUnder::Over };
        let under = |line| PredictionValue::TotalGoals { line, side: OverUnder::Under };
        assert!(check(&over(2.5), &outcome));
        assert!(!check(&over(3.0), &outcome));
        assert!(!check(&under(3.0), &outcome));
        assert!(check(&under(3.5), &outcome));
    }

    #[test]
    fn test_rows_from_another_tournament_rejected() {
        let table = vec![entry(1, 1, 3, 1, 2)];
        assert_eq!(
            RealizedOutcome::new(2, &table, &[]).unwrap_err(),
            EngineError::MixedTournaments { expected: 2, found: 1 }
        );

        let awards = vec![award(1, AchievementType::TopScorer, None)];
        assert!(RealizedOutcome::new(2, &[], &awards).is_err());
    }
}
