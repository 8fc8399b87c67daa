use proptest::prelude::*;

use league_scoring::achievements::evaluate_achievements;
use league_scoring::domain::{AchievementType, Match, Player, Roster};
use league_scoring::standings::{compare_entries, compute_league_table, is_sorted};

const PLAYERS: i64 = 6;

fn roster() -> Roster {
    Roster::new((1..=PLAYERS).map(|id| Player {
        id,
        nickname: format!("player{}", id),
    }))
}

fn arb_match() -> impl Strategy<Value = (i64, i64, i32, i32, bool)> {
    (1..=PLAYERS, 1..PLAYERS, 0..7i32, 0..7i32, proptest::bool::weighted(0.8))
}

fn build_matches(raw: Vec<(i64, i64, i32, i32, bool)>) -> Vec<Match> {
    raw.into_iter()
        .enumerate()
        .map(|(idx, (p1, offset, s1, s2, completed))| Match {
            id: idx as i64 + 1,
            tournament_id: 1,
            player1_id: p1,
            player2_id: (p1 - 1 + offset) % PLAYERS + 1,
            team1_id: None,
            team2_id: None,
            player1_score: completed.then_some(s1),
            player2_score: completed.then_some(s2),
            is_completed: completed,
        })
        .collect()
}

proptest! {
    #[test]
    fn points_and_goal_difference_identities(raw in prop::collection::vec(arb_match(), 0..30)) {
        let table = compute_league_table(&build_matches(raw), &roster()).unwrap();
        for e in &table {
            prop_assert_eq!(e.points, 3 * e.wins + e.draws);
            prop_assert_eq!(e.goal_difference, e.goals_for as i64 - e.goals_against as i64);
            prop_assert_eq!(e.matches_played, e.wins + e.draws + e.losses);
            prop_assert!(e.matches_played > 0);
        }
    }

    #[test]
    fn table_is_totally_ordered(raw in prop::collection::vec(arb_match(), 0..30)) {
        let table = compute_league_table(&build_matches(raw), &roster()).unwrap();
        prop_assert!(is_sorted(&table));

        let mut resorted = table.clone();
        resorted.reverse();
        resorted.sort_by(compare_entries);
        prop_assert_eq!(&resorted, &table);

        let positions: Vec<u32> = table.iter().map(|e| e.position).collect();
        let expected: Vec<u32> = (1..=table.len() as u32).collect();
        prop_assert_eq!(positions, expected);
    }

    #[test]
    fn wins_balance_losses(raw in prop::collection::vec(arb_match(), 0..30)) {
        let table = compute_league_table(&build_matches(raw), &roster()).unwrap();
        let wins: u32 = table.iter().map(|e| e.wins).sum();
        let losses: u32 = table.iter().map(|e| e.losses).sum();
        let goals_for: u32 = table.iter().map(|e| e.goals_for).sum();
        let goals_against: u32 = table.iter().map(|e| e.goals_against).sum();
        prop_assert_eq!(wins, losses);
        prop_assert_eq!(goals_for, goals_against);
    }

    #[test]
    fn achievements_are_repeatable(raw in prop::collection::vec(arb_match(), 0..20)) {
        let matches = build_matches(raw);
        let table = compute_league_table(&matches, &roster()).unwrap();
        let first = evaluate_achievements(1, &matches, &table).unwrap();
        let second = evaluate_achievements(1, &matches, &table).unwrap();

        prop_assert_eq!(first.len(), second.len());
        prop_assert!(first.iter().zip(&second).all(|(a, b)| a.same_award(b)));

        let kings = first
            .iter()
            .filter(|a| a.achievement_type == AchievementType::KingOfEmotions)
            .count();
        prop_assert!(kings <= 1);

        let podium = first
            .iter()
            .filter(|a| a.achievement_type == AchievementType::TournamentWinner)
            .count();
        prop_assert_eq!(podium, table.len().min(3));
    }
}
