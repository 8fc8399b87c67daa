use anyhow::{Context, Result};
use rusqlite::{params, Connection, Transaction};

use crate::domain::{LeagueTableEntry, TournamentId};
use crate::errors::{fetch_context, replace_context};

/// Swaps a tournament's stored table for `entries` inside the caller's transaction
pub fn replace_league_table(
    tx: &Transaction<'_>,
    tournament_id: TournamentId,
    entries: &[LeagueTableEntry],
) -> Result<()> {
    tx.execute(
        "DELETE FROM league_table WHERE tournament_id = ?1",
        params![tournament_id],
    )
    .with_context(|| replace_context("league table", tournament_id))?;
    {
        let mut stmt = tx.prepare("INSERT INTO league_table (tournament_id, player_id, nickname, matches_played, wins, draws, losses, goals_for, goals_against, goal_difference, points, position) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)")?;
        for e in entries {
            stmt.execute(params![
                e.tournament_id,
                e.player_id,
                e.nickname,
                e.matches_played,
                e.wins,
                e.draws,
                e.losses,
                e.goals_for,
                e.goals_against,
                e.goal_difference,
                e.points,
                e.position
            ])
            .with_context(|| replace_context("league table", tournament_id))?;
        }
    }
    Ok(())
}

fn parse_entry_row(row: &rusqlite::Row) -> rusqlite::Result<LeagueTableEntry> {
    Ok(LeagueTableEntry {
        tournament_id: row.get(0)?,
        player_id: row.get(1)?,
        nickname: row.get(2)?,
        matches_played: row.get(3)?,
        wins: row.get(4)?,
        draws: row.get(5)?,
        losses: row.get(6)?,
        goals_for: row.get(7)?,
        goals_against: row.get(8)?,
        goal_difference: row.get(9)?,
        points: row.get(10)?,
        position: row.get(11)?,
    })
}

pub fn list_by_tournament(
    conn: &Connection,
    tournament_id: TournamentId,
) -> Result<Vec<LeagueTableEntry>> {
    let sql = "SELECT tournament_id, player_id, nickname, matches_played, wins, draws, losses, goals_for, goals_against, goal_difference, points, position FROM league_table WHERE tournament_id = ?1 ORDER BY position";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![tournament_id], parse_entry_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| fetch_context("league table", tournament_id))?;

    Ok(rows)
}
