use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};
use rusqlite::Connection;
use std::sync::Arc;

use super::{internal_error, not_found, AppState, LeaderboardParams};
use crate::api::models::{LeaderboardResponse, PlayerBettingStats};
use crate::database;
use crate::domain::{BettingRankingEntry, PlayerId};
use crate::ranking::aggregate_rankings;
use crate::services::recompute::scored_coupons;

fn load_leaderboard(conn: &Connection) -> anyhow::Result<Vec<BettingRankingEntry>> {
    let coupons = scored_coupons(conn)?;
    let stats = database::betting::list_player_stats(conn)?;
    let roster = database::players::load_roster(conn)?;
    Ok(aggregate_rankings(&coupons, &stats, &roster)?)
}

pub async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeaderboardParams>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(50).clamp(1, 500);

    let conn = match database::get_connection(&state.pool) {
        Ok(conn) => conn,
        Err(e) => return internal_error(e),
    };

    match load_leaderboard(&conn) {
        Ok(rows) => {
            let total = rows.len();
            Json(LeaderboardResponse {
                items: rows.into_iter().take(limit).map(Into::into).collect(),
                total,
            })
            .into_response()
        }
        Err(e) => internal_error(format!("{:#}", e)),
    }
}

pub async fn get_player_stats(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<PlayerId>,
) -> impl IntoResponse {
    let conn = match database::get_connection(&state.pool) {
        Ok(conn) => conn,
        Err(e) => return internal_error(e),
    };

    let player = match database::players::find_by_id(&conn, player_id) {
        Ok(Some(player)) => player,
        Ok(None) => return not_found(format!("Player {}", player_id)),
        Err(e) => return internal_error(e),
    };

    match database::betting::get_player_stats(&conn, player_id) {
        Ok(Some(stats)) => Json(PlayerBettingStats::new(player.nickname, stats)).into_response(),
        Ok(None) => not_found(format!("Betting stats for player {}", player_id)),
        Err(e) => internal_error(e),
    }
}
