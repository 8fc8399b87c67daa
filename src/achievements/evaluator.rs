use std::collections::HashMap;

use chrono::{DateTime, Utc};
use log::debug;

use crate::domain::{Achievement, AchievementType, LeagueTableEntry, Match, PlayerId, TournamentId};
use crate::errors::{EngineError, EngineResult};

const PODIUM_SIZE: usize = 3;

/// Derives the full achievement set for a tournament, stamped with the
/// current time. See [`evaluate_achievements_at`].
pub fn evaluate_achievements(
    tournament_id: TournamentId,
    matches: &[Match],
    table: &[LeagueTableEntry],
) -> EngineResult<Vec<Achievement>> {
    evaluate_achievements_at(tournament_id, matches, table, Utc::now())
}

/// Derives the full achievement set for a tournament.
///
/// The result replaces every stored achievement of the tournament, so the
/// same input always yields the same awards in the same order. Ties on
/// top_scorer, defensive_leader and most_conceded award every tied player;
/// king_of_emotions goes to a single player.
pub fn evaluate_achievements_at(
    tournament_id: TournamentId,
    matches: &[Match],
    table: &[LeagueTableEntry],
    awarded_at: DateTime<Utc>,
) -> EngineResult<Vec<Achievement>> {
    let completed = completed_matches(tournament_id, matches)?;
    if completed.is_empty() || table.is_empty() {
        debug!("Tournament {}: nothing to award", tournament_id);
        return Ok(Vec::new());
    }
    check_table(tournament_id, table)?;

    let award = AwardBuilder {
        tournament_id,
        awarded_at,
    };

    let mut achievements = Vec::new();
    achievements.extend(podium(&award, table));
    achievements.extend(top_scorers(&award, table));
    achievements.extend(defensive_leaders(&award, table));
    achievements.extend(most_conceded(&award, table));
    achievements.extend(king_of_emotions(&award, &completed, table));

    debug!(
        "Tournament {}: {} achievements derived",
        tournament_id,
        achievements.len()
    );
    Ok(achievements)
}

fn completed_matches(tournament_id: TournamentId, matches: &[Match]) -> EngineResult<Vec<&Match>> {
    let mut completed = Vec::new();
    for m in matches {
        if m.tournament_id != tournament_id {
            return Err(EngineError::MixedTournaments {
                expected: tournament_id,
                found: m.tournament_id,
            });
        }
        m.validate()?;
        if m.is_completed {
            completed.push(m);
        }
    }
    Ok(completed)
}

fn check_table(tournament_id: TournamentId, table: &[LeagueTableEntry]) -> EngineResult<()> {
    match table.iter().find(|e| e.tournament_id != tournament_id) {
        Some(entry) => Err(EngineError::MixedTournaments {
            expected: tournament_id,
            found: entry.tournament_id,
        }),
        None => Ok(()),
    }
}

struct AwardBuilder {
    tournament_id: TournamentId,
    awarded_at: DateTime<Utc>,
}

impl AwardBuilder {
    fn build(
        &self,
        entry: &LeagueTableEntry,
        achievement_type: AchievementType,
        rank: Option<u8>,
        title: &str,
        description: String,
        value: f64,
    ) -> Achievement {
        Achievement {
            player_id: entry.player_id,
            tournament_id: Some(self.tournament_id),
            achievement_type,
            achievement_rank: rank,
            title: title.to_string(),
            description,
            value: Some(value),
            awarded_at: self.awarded_at,
        }
    }
}

fn podium(award: &AwardBuilder, table: &[LeagueTableEntry]) -> Vec<Achievement> {
    table
        .iter()
        .take(PODIUM_SIZE)
        .map(|entry| {
            let rank = entry.position as u8;
            let title = match rank {
                1 => "Champion",
                2 => "Runner-up",
                _ => "Third Place",
            };
            award.build(
                entry,
                AchievementType::TournamentWinner,
                Some(rank),
                title,
                format!("{} finished #{} with {} points", entry.nickname, rank, entry.points),
                entry.points as f64,
            )
        })
        .collect()
}

#[derive(Clone, Copy)]
enum Extreme {
    Max,
    Min,
}

/// Every entry sharing the extreme value of `key`
fn tied_at<F>(table: &[LeagueTableEntry], key: F, extreme: Extreme) -> Vec<&LeagueTableEntry>
where
    F: Fn(&LeagueTableEntry) -> u32,
{
    let values = table.iter().map(&key);
    let target = match extreme {
        Extreme::Max => values.max(),
        Extreme::Min => values.min(),
    };
    let Some(target) = target else {
        return Vec::new();
    };
    table.iter().filter(|e| key(e) == target).collect()
}

fn top_scorers(award: &AwardBuilder, table: &[LeagueTableEntry]) -> Vec<Achievement> {
    tied_at(table, |e| e.goals_for, Extreme::Max)
        .into_iter()
        .filter(|e| e.goals_for > 0)
        .map(|e| {
            award.build(
                e,
                AchievementType::TopScorer,
                None,
                "Top Scorer",
                format!("{} scored {} goals", e.nickname, e.goals_for),
                e.goals_for as f64,
            )
        })
        .collect()
}

fn defensive_leaders(award: &AwardBuilder, table: &[LeagueTableEntry]) -> Vec<Achievement> {
    tied_at(table, |e| e.goals_against, Extreme::Min)
        .into_iter()
        .map(|e| {
            award.build(
                e,
                AchievementType::DefensiveLeader,
                None,
                "Defensive Leader",
                format!("{} conceded only {} goals", e.nickname, e.goals_against),
                e.goals_against as f64,
            )
        })
        .collect()
}

fn most_conceded(award: &AwardBuilder, table: &[LeagueTableEntry]) -> Vec<Achievement> {
    tied_at(table, |e| e.goals_against, Extreme::Max)
        .into_iter()
        .filter(|e| e.goals_against > 0)
        .map(|e| {
            award.build(
                e,
                AchievementType::MostConceded,
                None,
                "Leaky Defence",
                format!("{} conceded {} goals", e.nickname, e.goals_against),
                e.goals_against as f64,
            )
        })
        .collect()
}

/// Sum of |score1 - score2| over each player's completed matches
fn goal_swings(matches: &[&Match]) -> HashMap<PlayerId, u32> {
    let mut swings = HashMap::new();
    for m in matches {
        if let (Some(a), Some(b)) = (m.player1_score, m.player2_score) {
            let swing = a.abs_diff(b);
            *swings.entry(m.player1_id).or_insert(0) += swing;
            *swings.entry(m.player2_id).or_insert(0) += swing;
        }
    }
    swings
}

fn king_of_emotions(
    award: &AwardBuilder,
    matches: &[&Match],
    table: &[LeagueTableEntry],
) -> Option<Achievement> {
    let swings = goal_swings(matches);

    let king = table
        .iter()
        .map(|e| (e, swings.get(&e.player_id).copied().unwrap_or(0)))
        .filter(|(_, swing)| *swing > 0)
        .min_by(|(a, sa), (b, sb)| {
            sb.cmp(sa)
                .then_with(|| b.matches_played.cmp(&a.matches_played))
                .then_with(|| a.nickname.cmp(&b.nickname))
                .then_with(|| a.player_id.cmp(&b.player_id))
        })?;

    let (entry, swing) = king;
    Some(award.build(
        entry,
        AchievementType::KingOfEmotions,
        None,
        "King of Emotions",
        format!("{}'s matches swung by {} goals in total", entry.nickname, swing),
        swing as f64,
    ))
}
