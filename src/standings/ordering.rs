use std::cmp::Ordering;

use crate::domain::LeagueTableEntry;

/// League table comparator: points, goal difference and goals for descending,
/// then nickname ascending. Player id settles duplicate nicknames so the
/// order stays total.
pub fn compare_entries(a: &LeagueTableEntry, b: &LeagueTableEntry) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.goal_difference.cmp(&a.goal_difference))
        .then_with(|| b.goals_for.cmp(&a.goals_for))
        .then_with(|| a.nickname.cmp(&b.nickname))
        .then_with(|| a.player_id.cmp(&b.player_id))
}

/// Sporting tie: equal on every criterion except the nickname fallback
pub fn is_sporting_tie(a: &LeagueTableEntry, b: &LeagueTableEntry) -> bool {
    a.points == b.points && a.goal_difference == b.goal_difference && a.goals_for == b.goals_for
}

pub fn is_sorted(entries: &[LeagueTableEntry]) -> bool {
    entries
        .windows(2)
        .all(|w| compare_entries(&w[0], &w[1]) != Ordering::Greater)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(nickname: &str, points: u32, gd: i64, gf: u32) -> LeagueTableEntry {
        LeagueTableEntry {
            tournament_id: 1,
            player_id: nickname.len() as i64,
            nickname: nickname.to_string(),
            matches_played: 1,
            wins: 0,
            draws: 0,
            losses: 0,
            goals_for: gf,
            goals_against: (gf as i64 - gd) as u32,
            goal_difference: gd,
            points,
            position: 0,
        }
    }

    #[test]
    fn test_points_dominate() {
        let a = entry("zed", 4, -5, 0);
        let b = entry("amy", 3, 10, 10);
        assert_eq!(compare_entries(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_goals_for_before_nickname() {
        let a = entry("zed", 3, 1, 4);
        let b = entry("amy", 3, 1, 2);
        assert_eq!(compare_entries(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_nickname_last() {
        let a = entry("amy", 3, 1, 2);
        let b = entry("zed", 3, 1, 2);
        assert_eq!(compare_entries(&a, &b), Ordering::Less);
        assert!(is_sporting_tie(&a, &b));
    }

    #[test]
    fn test_is_sorted() {
        let rows = vec![entry("amy", 6, 2, 3), entry("bo", 3, 0, 1), entry("cy", 3, 0, 1)];
        assert!(is_sorted(&rows));
        let reversed: Vec<_> = rows.into_iter().rev().collect();
        assert!(!is_sorted(&reversed));
    }
}
