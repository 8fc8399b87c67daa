use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{internal_error, not_found, AppState};
use crate::database;
use crate::domain::TournamentId;

fn is_authorized(headers: &HeaderMap, token: Option<&str>) -> bool {
    let Some(expected) = token else {
        return false;
    };
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        == Some(expected)
}

pub async fn recompute_tournament(
    State(state): State<Arc<AppState>>,
    Path(tournament_id): Path<TournamentId>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if !is_authorized(&headers, state.config.server.admin_token.as_deref()) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    match database::get_connection(&state.pool)
        .and_then(|conn| database::tournaments::find_by_id(&conn, tournament_id))
    {
        Ok(Some(_)) => {}
        Ok(None) => return not_found(format!("Tournament {}", tournament_id)),
        Err(e) => return internal_error(e),
    }

    log::info!("Admin triggered recompute of tournament {}", tournament_id);
    let service = state.recompute_service();
    match tokio::task::spawn_blocking(move || service.recompute_tournament(tournament_id)).await {
        Ok(Ok(summary)) => Json(summary).into_response(),
        Ok(Err(e)) => internal_error(format!("{:#}", e)),
        Err(e) => internal_error(e),
    }
}
