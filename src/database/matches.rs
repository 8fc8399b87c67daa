use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::connection::DbConn;
use crate::domain::{Match, TournamentId};
use crate::errors::fetch_context;

pub fn upsert_match(conn: &mut DbConn, m: &Match) -> Result<()> {
    let sql = "INSERT INTO matches (id, tournament_id, player1_id, player2_id, team1_id, team2_id, player1_score, player2_score, is_completed) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) ON CONFLICT(id) DO UPDATE SET tournament_id = excluded.tournament_id, player1_id = excluded.player1_id, player2_id = excluded.player2_id, team1_id = excluded.team1_id, team2_id = excluded.team2_id, player1_score = excluded.player1_score, player2_score = excluded.player2_score, is_completed = excluded.is_completed";

    conn.execute(
        sql,
        params![
            m.id,
            m.tournament_id,
            m.player1_id,
            m.player2_id,
            m.team1_id,
            m.team2_id,
            m.player1_score,
            m.player2_score,
            m.is_completed
        ],
    )
    .with_context(|| format!("Failed to upsert match {}", m.id))?;
    Ok(())
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<Match> {
    Ok(Match {
        id: row.get(0)?,
        tournament_id: row.get(1)?,
        player1_id: row.get(2)?,
        player2_id: row.get(3)?,
        team1_id: row.get(4)?,
        team2_id: row.get(5)?,
        player1_score: row.get(6)?,
        player2_score: row.get(7)?,
        is_completed: row.get(8)?,
    })
}

pub fn list_by_tournament(conn: &Connection, tournament_id: TournamentId) -> Result<Vec<Match>> {
    let sql = "SELECT id, tournament_id, player1_id, player2_id, team1_id, team2_id, player1_score, player2_score, is_completed FROM matches WHERE tournament_id = ?1 ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![tournament_id], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| fetch_context("matches", tournament_id))?;

    Ok(rows)
}
