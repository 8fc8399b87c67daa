use std::collections::HashMap;

use log::debug;

use super::ordering::compare_entries;
use super::{POINTS_PER_DRAW, POINTS_PER_WIN};
use crate::domain::{LeagueTableEntry, Match, PlayerId, Roster, TournamentId};
use crate::errors::{EngineError, EngineResult};

#[derive(Debug, Default, Clone)]
struct Tally {
    played: u32,
    wins: u32,
    draws: u32,
    losses: u32,
    goals_for: u32,
    goals_against: u32,
}

impl Tally {
    fn record(&mut self, scored: u32, conceded: u32) {
        self.played += 1;
        self.goals_for += scored;
        self.goals_against += conceded;
        match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => self.wins += 1,
            std::cmp::Ordering::Equal => self.draws += 1,
            std::cmp::Ordering::Less => self.losses += 1,
        }
    }

    fn points(&self) -> u32 {
        POINTS_PER_WIN * self.wins + POINTS_PER_DRAW * self.draws
    }
}

/// Folds the completed matches of one tournament into an ordered league table.
///
/// Incomplete matches are ignored and players without a completed match are
/// left out. Positions run 1..n without sharing, following the
/// points → goal difference → goals for → nickname ordering.
pub fn compute_league_table(
    matches: &[Match],
    roster: &Roster,
) -> EngineResult<Vec<LeagueTableEntry>> {
    let Some(tournament_id) = single_tournament(matches)? else {
        return Ok(Vec::new());
    };

    // 1. Accumulate per-player tallies from completed matches
    let tallies = tally_completed(matches)?;
    debug!(
        "Tournament {}: {} players with completed matches",
        tournament_id,
        tallies.len()
    );

    // 2. Turn tallies into unpositioned entries
    let mut entries = tallies
        .into_iter()
        .map(|(player_id, tally)| build_entry(tournament_id, player_id, &tally, roster))
        .collect::<EngineResult<Vec<_>>>()?;

    // 3. Order and number
    entries.sort_by(compare_entries);
    assign_positions(&mut entries);

    Ok(entries)
}

fn single_tournament(matches: &[Match]) -> EngineResult<Option<TournamentId>> {
    let Some(first) = matches.first() else {
        return Ok(None);
    };
    let expected = first.tournament_id;
    if let Some(other) = matches.iter().find(|m| m.tournament_id != expected) {
        return Err(EngineError::MixedTournaments {
            expected,
            found: other.tournament_id,
        });
    }
    Ok(Some(expected))
}

fn tally_completed(matches: &[Match]) -> EngineResult<HashMap<PlayerId, Tally>> {
    let mut tallies: HashMap<PlayerId, Tally> = HashMap::new();

    for m in matches {
        m.validate()?;
        let Some((goals1, goals2)) = m.outcome()? else {
            continue;
        };
        tallies.entry(m.player1_id).or_default().record(goals1, goals2);
        tallies.entry(m.player2_id).or_default().record(goals2, goals1);
    }

    Ok(tallies)
}

fn build_entry(
    tournament_id: TournamentId,
    player_id: PlayerId,
    tally: &Tally,
    roster: &Roster,
) -> EngineResult<LeagueTableEntry> {
    Ok(LeagueTableEntry {
        tournament_id,
        player_id,
        nickname: roster.nickname(player_id)?.to_string(),
        matches_played: tally.played,
        wins: tally.wins,
        draws: tally.draws,
        losses: tally.losses,
        goals_for: tally.goals_for,
        goals_against: tally.goals_against,
        goal_difference: tally.goals_for as i64 - tally.goals_against as i64,
        points: tally.points(),
        position: 0,
    })
}

fn assign_positions(entries: &mut [LeagueTableEntry]) {
    for (idx, entry) in entries.iter_mut().enumerate() {
        entry.position = idx as u32 + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Player;

    fn roster() -> Roster {
        Roster::new(
            [(1, "ana"), (2, "bob"), (3, "cid"), (4, "dan")]
                .into_iter()
                .map(|(id, nick)| Player { id, nickname: nick.to_string() }),
        )
    }

    fn played(id: i64, p1: i64, p2: i64, s1: i32, s2: i32) -> Match {
        Match {
            id,
            tournament_id: 1,
            player1_id: p1,
            player2_id: p2,
            team1_id: None,
            team2_id: None,
            player1_score: Some(s1),
            player2_score: Some(s2),
            is_completed: true,
        }
    }

    fn pending(id: i64, p1: i64, p2: i64) -> Match {
        Match {
            player1_score: None,
            player2_score: None,
            is_completed: false,
            ..played(id, p1, p2, 0, 0)
        }
    }

    #[test]
    fn test_empty_input_gives_empty_table() {
        assert!(compute_league_table(&[], &roster()).unwrap().is_empty());
    }

    #[test]
    fn test_single_win() {
        let table = compute_league_table(&[played(1, 1, 2, 3, 1)], &roster()).unwrap();
        assert_eq!(table.len(), 2);

        let a = &table[0];
        assert_eq!((a.player_id, a.points, a.goal_difference, a.position), (1, 3, 2, 1));
        assert_eq!((a.wins, a.draws, a.losses), (1, 0, 0));

        let b = &table[1];
        assert_eq!((b.player_id, b.points, b.goal_difference, b.position), (2, 0, -2, 2));
        assert_eq!(b.losses, 1);
    }

    #[test]
    fn test_draw_gives_one_point_each() {
        let table = compute_league_table(&[played(1, 1, 2, 2, 2)], &roster()).unwrap();
        assert!(table.iter().all(|e| e.points == 1 && e.draws == 1));
    }

    #[test]
    fn test_incomplete_matches_ignored_and_players_excluded() {
        let matches = vec![played(1, 1, 2, 1, 0), pending(2, 3, 4)];
        let table = compute_league_table(&matches, &roster()).unwrap();
        let ids: Vec<_> = table.iter().map(|e| e.player_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_only_pending_matches_gives_empty_table() {
        let table = compute_league_table(&[pending(1, 1, 2)], &roster()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_tie_break_cascade() {
        // ana and bob both on 3 pts split by GD; cid and dan both on 1 pt split by GD
        let matches = vec![
            played(1, 1, 3, 4, 0),
            played(2, 2, 4, 1, 0),
            played(3, 3, 4, 0, 0),
        ];
        let table = compute_league_table(&matches, &roster()).unwrap();
        let order: Vec<_> = table.iter().map(|e| e.nickname.as_str()).collect();
        assert_eq!(order, vec!["ana", "bob", "dan", "cid"]);
        let positions: Vec<_> = table.iter().map(|e| e.position).collect();
        assert_eq!(positions, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_full_tie_positions_are_sequential() {
        // Two identical 1-1 draws against each other: fully tied except nickname
        let matches = vec![played(1, 2, 1, 1, 1), played(2, 1, 2, 1, 1)];
        let table = compute_league_table(&matches, &roster()).unwrap();
        assert_eq!(table[0].nickname, "ana");
        assert_eq!(table[0].position, 1);
        assert_eq!(table[1].nickname, "bob");
        assert_eq!(table[1].position, 2);
    }

    #[test]
    fn test_completed_match_without_score_is_rejected() {
        let mut bad = played(5, 1, 2, 1, 0);
        bad.player2_score = None;
        assert_eq!(
            compute_league_table(&[bad], &roster()),
            Err(EngineError::MissingScore { match_id: 5 })
        );
    }

    #[test]
    fn test_unknown_player_is_rejected() {
        let result = compute_league_table(&[played(1, 1, 9, 1, 0)], &roster());
        assert_eq!(result, Err(EngineError::UnknownPlayer(9)));
    }

    #[test]
    fn test_mixed_tournaments_rejected() {
        let mut other = played(2, 3, 4, 1, 1);
        other.tournament_id = 2;
        let result = compute_league_table(&[played(1, 1, 2, 1, 0), other], &roster());
        assert_eq!(result, Err(EngineError::MixedTournaments { expected: 1, found: 2 }));
    }
}
