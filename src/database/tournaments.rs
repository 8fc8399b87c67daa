use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::connection::DbConn;
use crate::domain::{Tournament, TournamentId, TournamentStatus};

pub fn upsert_tournament(conn: &mut DbConn, tournament: &Tournament) -> Result<()> {
    let sql = "INSERT INTO tournaments (id, name, status) VALUES (?1, ?2, ?3) ON CONFLICT(id) DO UPDATE SET name = excluded.name, status = excluded.status";

    conn.execute(
        sql,
        params![tournament.id, tournament.name, tournament.status.as_str()],
    )
    .with_context(|| format!("Failed to upsert tournament {}", tournament.id))?;
    Ok(())
}

fn parse_tournament_row(row: &rusqlite::Row) -> rusqlite::Result<(TournamentId, String, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn into_tournament((id, name, status): (TournamentId, String, String)) -> Result<Tournament> {
    let status = TournamentStatus::parse(&status)
        .ok_or_else(|| anyhow!("Tournament {} has unknown status '{}'", id, status))?;
    Ok(Tournament { id, name, status })
}

pub fn find_by_id(conn: &Connection, id: TournamentId) -> Result<Option<Tournament>> {
    let sql = "SELECT id, name, status FROM tournaments WHERE id = ?1";

    conn.query_row(sql, params![id], parse_tournament_row)
        .optional()
        .context("Failed to query tournament by id")?
        .map(into_tournament)
        .transpose()
}

pub fn list_all(conn: &Connection) -> Result<Vec<Tournament>> {
    let sql = "SELECT id, name, status FROM tournaments ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], parse_tournament_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter().map(into_tournament).collect()
}
