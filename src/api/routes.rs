use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{
    admin::recompute_tournament,
    betting::{get_leaderboard, get_player_stats},
    tournaments::{get_achievements, get_preview, get_standings},
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/tournaments/:id/standings", get(get_standings))
        .route("/api/tournaments/:id/achievements", get(get_achievements))
        .route("/api/tournaments/:id/preview", get(get_preview))
        .route("/api/betting/leaderboard", get(get_leaderboard))
        .route("/api/betting/players/:id/stats", get(get_player_stats))
        .route("/api/admin/tournaments/:id/recompute", post(recompute_tournament))
        .with_state(state)
}
