use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::connection::DbConn;
use crate::domain::{Player, PlayerId, Roster};

pub fn upsert_player(conn: &mut DbConn, player: &Player) -> Result<Player> {
    let sql = "INSERT INTO players (id, nickname) VALUES (?1, ?2) ON CONFLICT(id) DO UPDATE SET nickname = excluded.nickname RETURNING id, nickname";

    conn.query_row(sql, params![player.id, player.nickname], parse_player_row)
        .with_context(|| format!("Failed to upsert player {}", player.id))
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        nickname: row.get(1)?,
    })
}

pub fn find_by_id(conn: &Connection, id: PlayerId) -> Result<Option<Player>> {
    let sql = "SELECT id, nickname FROM players WHERE id = ?1";

    conn.query_row(sql, params![id], parse_player_row)
        .optional()
        .context("Failed to query player by id")
}

pub fn list_all(conn: &Connection) -> Result<Vec<Player>> {
    let sql = "SELECT id, nickname FROM players ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn load_roster(conn: &Connection) -> Result<Roster> {
    Ok(Roster::new(list_all(conn)?))
}
