use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Transaction};

use crate::domain::{Achievement, AchievementType, PlayerId, TournamentId};
use crate::errors::{fetch_context, replace_context};

/// Swaps a tournament's stored achievements inside the caller's transaction
pub fn replace_achievements(
    tx: &Transaction<'_>,
    tournament_id: TournamentId,
    achievements: &[Achievement],
) -> Result<()> {
    tx.execute(
        "DELETE FROM achievements WHERE tournament_id = ?1",
        params![tournament_id],
    )
    .with_context(|| replace_context("achievements", tournament_id))?;
    {
        let mut stmt = tx.prepare("INSERT INTO achievements (player_id, tournament_id, achievement_type, achievement_rank, title, description, value, awarded_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)")?;
        for a in achievements {
            stmt.execute(params![
                a.player_id,
                a.tournament_id,
                a.achievement_type.as_str(),
                a.achievement_rank,
                a.title,
                a.description,
                a.value,
                a.awarded_at
            ])
            .with_context(|| replace_context("achievements", tournament_id))?;
        }
    }
    Ok(())
}

type AchievementRow = (
    PlayerId,
    Option<TournamentId>,
    String,
    Option<u8>,
    String,
    String,
    Option<f64>,
    DateTime<Utc>,
);

fn parse_achievement_row(row: &rusqlite::Row) -> rusqlite::Result<AchievementRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
    ))
}

fn into_achievement(row: AchievementRow) -> Result<Achievement> {
    let (player_id, tournament_id, kind, achievement_rank, title, description, value, awarded_at) =
        row;
    let achievement_type = AchievementType::parse(&kind)
        .ok_or_else(|| anyhow!("Unknown achievement type '{}' in storage", kind))?;
    Ok(Achievement {
        player_id,
        tournament_id,
        achievement_type,
        achievement_rank,
        title,
        description,
        value,
        awarded_at,
    })
}

/// Achievements of a tournament in the order they were evaluated
pub fn list_by_tournament(
    conn: &Connection,
    tournament_id: TournamentId,
) -> Result<Vec<Achievement>> {
    let sql = "SELECT player_id, tournament_id, achievement_type, achievement_rank, title, description, value, awarded_at FROM achievements WHERE tournament_id = ?1 ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![tournament_id], parse_achievement_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| fetch_context("achievements", tournament_id))?;

    rows.into_iter().map(into_achievement).collect()
}
