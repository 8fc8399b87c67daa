use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json, Response},
};
use rusqlite::Connection;
use std::sync::Arc;

use super::{internal_error, not_found, AppState};
use crate::api::models::{AchievementsResponse, PreviewResponse, StandingsResponse};
use crate::database;
use crate::domain::{Tournament, TournamentId};

fn load_tournament(conn: &Connection, id: TournamentId) -> Result<Tournament, Response> {
    match database::tournaments::find_by_id(conn, id) {
        Ok(Some(t)) => Ok(t),
        Ok(None) => Err(not_found(format!("Tournament {}", id))),
        Err(e) => Err(internal_error(e)),
    }
}

pub async fn get_standings(
    State(state): State<Arc<AppState>>,
    Path(tournament_id): Path<TournamentId>,
) -> impl IntoResponse {
    let conn = match database::get_connection(&state.pool) {
        Ok(conn) => conn,
        Err(e) => return internal_error(e),
    };
    let tournament = match load_tournament(&conn, tournament_id) {
        Ok(t) => t,
        Err(response) => return response,
    };

    match database::standings::list_by_tournament(&conn, tournament_id) {
        Ok(rows) => Json(StandingsResponse {
            tournament: (&tournament).into(),
            standings: rows.into_iter().map(Into::into).collect(),
        })
        .into_response(),
        Err(e) => internal_error(e),
    }
}

pub async fn get_achievements(
    State(state): State<Arc<AppState>>,
    Path(tournament_id): Path<TournamentId>,
) -> impl IntoResponse {
    let conn = match database::get_connection(&state.pool) {
        Ok(conn) => conn,
        Err(e) => return internal_error(e),
    };
    let tournament = match load_tournament(&conn, tournament_id) {
        Ok(t) => t,
        Err(response) => return response,
    };

    match database::achievements::list_by_tournament(&conn, tournament_id) {
        Ok(rows) => Json(AchievementsResponse {
            tournament: (&tournament).into(),
            achievements: rows.into_iter().map(Into::into).collect(),
        })
        .into_response(),
        Err(e) => internal_error(e),
    }
}

/// Standings and achievements computed from the current matches, nothing stored
pub async fn get_preview(
    State(state): State<Arc<AppState>>,
    Path(tournament_id): Path<TournamentId>,
) -> impl IntoResponse {
    {
        let conn = match database::get_connection(&state.pool) {
            Ok(conn) => conn,
            Err(e) => return internal_error(e),
        };
        if let Err(response) = load_tournament(&conn, tournament_id) {
            return response;
        }
    }

    let service = state.recompute_service();
    let preview = match tokio::task::spawn_blocking(move || service.preview(tournament_id)).await {
        Ok(Ok(preview)) => preview,
        Ok(Err(e)) => return internal_error(format!("{:#}", e)),
        Err(e) => return internal_error(e),
    };

    Json(PreviewResponse {
        tournament: (&preview.tournament).into(),
        resolved: preview.resolved,
        standings: preview.standings.into_iter().map(Into::into).collect(),
        achievements: preview.achievements.into_iter().map(Into::into).collect(),
    })
    .into_response()
}
