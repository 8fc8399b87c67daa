use std::collections::HashMap;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, Transaction};

use super::connection::DbConn;
use crate::domain::{BettingCoupon, BettingPrediction, CouponId, ScoredCoupon, TournamentId};
use crate::errors::{fetch_context, replace_context};

const COUPON_COLUMNS: &str = "id, tournament_id, player_id, name, is_submitted, total_points";
const PREDICTION_COLUMNS: &str =
    "id, coupon_id, prediction_type, prediction_value, points_awarded, is_correct";

/// Stores a coupon as placed; its total starts at zero until scored
pub fn upsert_coupon(conn: &mut DbConn, coupon: &BettingCoupon) -> Result<()> {
    let sql = "INSERT INTO betting_coupons (id, tournament_id, player_id, name, is_submitted, total_points) VALUES (?1, ?2, ?3, ?4, ?5, 0) ON CONFLICT(id) DO UPDATE SET tournament_id = excluded.tournament_id, player_id = excluded.player_id, name = excluded.name, is_submitted = excluded.is_submitted, total_points = 0";

    conn.execute(
        sql,
        params![
            coupon.id,
            coupon.tournament_id,
            coupon.player_id,
            coupon.name,
            coupon.is_submitted
        ],
    )
    .with_context(|| format!("Failed to upsert coupon {}", coupon.id))?;
    Ok(())
}

/// Stores a prediction as placed; any earlier scoring result is cleared
pub fn upsert_prediction(conn: &mut DbConn, prediction: &BettingPrediction) -> Result<()> {
    let sql = "INSERT INTO betting_predictions (id, coupon_id, prediction_type, prediction_value, points_awarded, is_correct) VALUES (?1, ?2, ?3, ?4, 0, NULL) ON CONFLICT(id) DO UPDATE SET coupon_id = excluded.coupon_id, prediction_type = excluded.prediction_type, prediction_value = excluded.prediction_value, points_awarded = 0, is_correct = NULL";

    conn.execute(
        sql,
        params![
            prediction.id,
            prediction.coupon_id,
            prediction.prediction_type,
            prediction.prediction_value
        ],
    )
    .with_context(|| format!("Failed to upsert prediction {}", prediction.id))?;
    Ok(())
}

fn parse_coupon_row(row: &rusqlite::Row) -> rusqlite::Result<BettingCoupon> {
    Ok(BettingCoupon {
        id: row.get(0)?,
        tournament_id: row.get(1)?,
        player_id: row.get(2)?,
        name: row.get(3)?,
        is_submitted: row.get(4)?,
        total_points: row.get(5)?,
    })
}

fn parse_prediction_row(row: &rusqlite::Row) -> rusqlite::Result<BettingPrediction> {
    Ok(BettingPrediction {
        id: row.get(0)?,
        coupon_id: row.get(1)?,
        prediction_type: row.get(2)?,
        prediction_value: row.get(3)?,
        points_awarded: row.get(4)?,
        is_correct: row.get(5)?,
    })
}

/// Coupons of one tournament with their predictions, ordered by coupon id
pub fn list_by_tournament(
    conn: &Connection,
    tournament_id: TournamentId,
) -> Result<Vec<(BettingCoupon, Vec<BettingPrediction>)>> {
    let coupon_sql = format!(
        "SELECT {} FROM betting_coupons WHERE tournament_id = ?1 ORDER BY id",
        COUPON_COLUMNS
    );
    let prediction_sql = "SELECT p.id, p.coupon_id, p.prediction_type, p.prediction_value, p.points_awarded, p.is_correct FROM betting_predictions p JOIN betting_coupons c ON c.id = p.coupon_id WHERE c.tournament_id = ?1 ORDER BY p.id";

    let coupons = {
        let mut stmt = conn.prepare(&coupon_sql)?;
        let rows = stmt
            .query_map(params![tournament_id], parse_coupon_row)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .with_context(|| fetch_context("coupons", tournament_id))?;
        rows
    };
    let predictions = {
        let mut stmt = conn.prepare(prediction_sql)?;
        let rows = stmt
            .query_map(params![tournament_id], parse_prediction_row)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .with_context(|| fetch_context("predictions", tournament_id))?;
        rows
    };

    Ok(attach_predictions(coupons, predictions))
}

/// Every stored coupon with its stored scoring result
pub fn list_all_scored(conn: &Connection) -> Result<Vec<ScoredCoupon>> {
    let coupons = {
        let sql = format!("SELECT {} FROM betting_coupons ORDER BY id", COUPON_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], parse_coupon_row)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to list coupons")?;
        rows
    };
    let predictions = {
        let sql = format!("SELECT {} FROM betting_predictions ORDER BY id", PREDICTION_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], parse_prediction_row)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to list predictions")?;
        rows
    };

    Ok(attach_predictions(coupons, predictions)
        .into_iter()
        .map(|(coupon, predictions)| ScoredCoupon {
            total_points: coupon.total_points,
            coupon,
            predictions,
        })
        .collect())
}

fn attach_predictions(
    coupons: Vec<BettingCoupon>,
    predictions: Vec<BettingPrediction>,
) -> Vec<(BettingCoupon, Vec<BettingPrediction>)> {
    let mut by_coupon: HashMap<CouponId, Vec<BettingPrediction>> = HashMap::new();
    for prediction in predictions {
        by_coupon.entry(prediction.coupon_id).or_default().push(prediction);
    }
    coupons
        .into_iter()
        .map(|coupon| {
            let predictions = by_coupon.remove(&coupon.id).unwrap_or_default();
            (coupon, predictions)
        })
        .collect()
}

/// Resets every coupon of a tournament to unscored: zero totals, zero points
/// and no correctness flag on its predictions
pub fn clear_scores(tx: &Transaction<'_>, tournament_id: TournamentId) -> Result<()> {
    tx.execute(
        "UPDATE betting_predictions SET points_awarded = 0, is_correct = NULL WHERE coupon_id IN (SELECT id FROM betting_coupons WHERE tournament_id = ?1)",
        params![tournament_id],
    )
    .with_context(|| replace_context("prediction scores", tournament_id))?;
    tx.execute(
        "UPDATE betting_coupons SET total_points = 0 WHERE tournament_id = ?1",
        params![tournament_id],
    )
    .with_context(|| replace_context("coupon totals", tournament_id))?;
    Ok(())
}

/// Writes coupon totals and per-prediction results inside the caller's transaction
pub fn save_scores(tx: &Transaction<'_>, scored: &[ScoredCoupon]) -> Result<()> {
    let mut coupon_stmt =
        tx.prepare("UPDATE betting_coupons SET total_points = ?1 WHERE id = ?2")?;
    let mut prediction_stmt = tx.prepare(
        "UPDATE betting_predictions SET points_awarded = ?1, is_correct = ?2 WHERE id = ?3",
    )?;

    for coupon in scored {
        coupon_stmt
            .execute(params![coupon.total_points, coupon.coupon.id])
            .with_context(|| format!("Failed to save total for coupon {}", coupon.coupon.id))?;
        for p in &coupon.predictions {
            prediction_stmt
                .execute(params![p.points_awarded, p.is_correct, p.id])
                .with_context(|| format!("Failed to save result for prediction {}", p.id))?;
        }
    }
    Ok(())
}
