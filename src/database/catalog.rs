use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::connection::DbConn;
use crate::domain::BettingPredictionType;

pub fn upsert_prediction_type(conn: &mut DbConn, entry: &BettingPredictionType) -> Result<()> {
    let sql = "INSERT INTO betting_prediction_types (key, display_name, points_for_correct, is_active) VALUES (?1, ?2, ?3, ?4) ON CONFLICT(key) DO UPDATE SET display_name = excluded.display_name, points_for_correct = excluded.points_for_correct, is_active = excluded.is_active";

    conn.execute(
        sql,
        params![
            entry.key,
            entry.display_name,
            entry.points_for_correct,
            entry.is_active
        ],
    )
    .with_context(|| format!("Failed to upsert prediction type '{}'", entry.key))?;
    Ok(())
}

/// Inserts entries whose key is not stored yet and leaves existing ones
/// untouched. Returns the number inserted.
pub fn seed_missing(conn: &mut DbConn, entries: &[BettingPredictionType]) -> Result<usize> {
    let sql = "INSERT OR IGNORE INTO betting_prediction_types (key, display_name, points_for_correct, is_active) VALUES (?1, ?2, ?3, ?4)";

    let mut inserted = 0;
    for entry in entries {
        inserted += conn
            .execute(
                sql,
                params![
                    entry.key,
                    entry.display_name,
                    entry.points_for_correct,
                    entry.is_active
                ],
            )
            .with_context(|| format!("Failed to seed prediction type '{}'", entry.key))?;
    }
    Ok(inserted)
}

fn parse_prediction_type_row(row: &rusqlite::Row) -> rusqlite::Result<BettingPredictionType> {
    Ok(BettingPredictionType {
        key: row.get(0)?,
        display_name: row.get(1)?,
        points_for_correct: row.get(2)?,
        is_active: row.get(3)?,
    })
}

pub fn list_all(conn: &Connection) -> Result<Vec<BettingPredictionType>> {
    let sql = "SELECT key, display_name, points_for_correct, is_active FROM betting_prediction_types ORDER BY key";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], parse_prediction_type_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list prediction types")?;

    Ok(rows)
}
