use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::DbPool;
use crate::services::{RecomputeService, TournamentLocks};

pub mod admin;
pub mod betting;
pub mod tournaments;

pub struct AppState {
    pub pool: DbPool,
    pub config: AppConfig,
    pub locks: Arc<TournamentLocks>,
}

impl AppState {
    pub fn recompute_service(&self) -> RecomputeService {
        RecomputeService::new(
            self.pool.clone(),
            self.config.betting.clone(),
            self.locks.clone(),
        )
    }
}

#[derive(Deserialize)]
pub struct LeaderboardParams {
    pub limit: Option<usize>,
}

fn internal_error(e: impl std::fmt::Display) -> Response {
    log::error!("Request failed: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e)).into_response()
}

fn not_found(what: String) -> Response {
    (StatusCode::NOT_FOUND, format!("{} not found", what)).into_response()
}
