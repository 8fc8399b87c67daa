use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Transaction};

use crate::domain::{BettingAchievement, BettingAchievementType, BettingPlayerStats, PlayerId, TournamentId};
use crate::errors::replace_context;

pub fn replace_betting_achievements(
    tx: &Transaction<'_>,
    tournament_id: TournamentId,
    awards: &[BettingAchievement],
) -> Result<()> {
    tx.execute(
        "DELETE FROM betting_achievements WHERE tournament_id = ?1",
        params![tournament_id],
    )
    .with_context(|| replace_context("betting achievements", tournament_id))?;
    {
        let mut stmt = tx.prepare("INSERT INTO betting_achievements (tournament_id, player_id, coupon_id, achievement_type, points_earned) VALUES (?1, ?2, ?3, ?4, ?5)")?;
        for a in awards {
            stmt.execute(params![
                a.tournament_id,
                a.player_id,
                a.coupon_id,
                a.achievement_type.as_str(),
                a.points_earned
            ])
            .with_context(|| replace_context("betting achievements", tournament_id))?;
        }
    }
    Ok(())
}

fn parse_award_row(row: &rusqlite::Row) -> rusqlite::Result<(TournamentId, PlayerId, i64, String, u32)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

pub fn list_betting_achievements(conn: &Connection) -> Result<Vec<BettingAchievement>> {
    let sql = "SELECT tournament_id, player_id, coupon_id, achievement_type, points_earned FROM betting_achievements ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], parse_award_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list betting achievements")?;

    rows.into_iter()
        .map(|(tournament_id, player_id, coupon_id, kind, points_earned)| {
            let achievement_type = BettingAchievementType::parse(&kind)
                .ok_or_else(|| anyhow!("Unknown betting achievement type '{}' in storage", kind))?;
            Ok(BettingAchievement {
                tournament_id,
                player_id,
                coupon_id,
                achievement_type,
                points_earned,
            })
        })
        .collect()
}

/// Replaces the whole stats table; stats are global across tournaments
pub fn replace_player_stats(tx: &Transaction<'_>, stats: &[BettingPlayerStats]) -> Result<()> {
    tx.execute("DELETE FROM betting_player_stats", [])
        .context("Failed to clear betting player stats")?;
    {
        let mut stmt = tx.prepare("INSERT INTO betting_player_stats (player_id, total_coupons, total_points, correct_predictions, total_predictions, accuracy_percentage, best_coupon_score, gambling_king_count, dark_horse_count) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)")?;
        for s in stats {
            stmt.execute(params![
                s.player_id,
                s.total_coupons,
                s.total_points,
                s.correct_predictions,
                s.total_predictions,
                s.accuracy_percentage,
                s.best_coupon_score,
                s.gambling_king_count,
                s.dark_horse_count
            ])
            .with_context(|| format!("Failed to store stats for player {}", s.player_id))?;
        }
    }
    Ok(())
}

fn parse_stats_row(row: &rusqlite::Row) -> rusqlite::Result<BettingPlayerStats> {
    Ok(BettingPlayerStats {
        player_id: row.get(0)?,
        total_coupons: row.get(1)?,
        total_points: row.get(2)?,
        correct_predictions: row.get(3)?,
        total_predictions: row.get(4)?,
        accuracy_percentage: row.get(5)?,
        best_coupon_score: row.get(6)?,
        gambling_king_count: row.get(7)?,
        dark_horse_count: row.get(8)?,
    })
}

const STATS_COLUMNS: &str = "player_id, total_coupons, total_points, correct_predictions, total_predictions, accuracy_percentage, best_coupon_score, gambling_king_count, dark_horse_count";

pub fn list_player_stats(conn: &Connection) -> Result<Vec<BettingPlayerStats>> {
    let sql = format!("SELECT {} FROM betting_player_stats ORDER BY player_id", STATS_COLUMNS);

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_stats_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list betting player stats")?;

    Ok(rows)
}

pub fn get_player_stats(conn: &Connection, player_id: PlayerId) -> Result<Option<BettingPlayerStats>> {
    let sql = format!("SELECT {} FROM betting_player_stats WHERE player_id = ?1", STATS_COLUMNS);

    conn.query_row(&sql, params![player_id], parse_stats_row)
        .optional()
        .context("Failed to get betting stats for player")
}
