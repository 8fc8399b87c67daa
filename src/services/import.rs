use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;

use crate::database::{self, DbConn, DbPool};
use crate::domain::{TournamentId, TournamentSnapshot};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub tournament_id: TournamentId,
    pub players: usize,
    pub matches: usize,
    pub prediction_types: usize,
    pub coupons: usize,
    pub predictions: usize,
}

/// Loads tournament snapshots into the database
pub struct ImportService {
    pool: DbPool,
}

impl ImportService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn import_file<P: AsRef<Path>>(&self, path: P) -> Result<ImportSummary> {
        let snapshot = TournamentSnapshot::load(path)?;
        self.import_snapshot(&snapshot)
    }

    /// Validates the snapshot and upserts it in one transaction
    pub fn import_snapshot(&self, snapshot: &TournamentSnapshot) -> Result<ImportSummary> {
        info!("=== Importing tournament {} ===", snapshot.tournament.id);

        snapshot
            .validate()
            .with_context(|| format!("Snapshot of tournament {} is invalid", snapshot.tournament.id))?;

        let mut conn = database::get_connection(&self.pool)?;
        conn.execute_batch("BEGIN IMMEDIATE")
            .context("Failed to begin import transaction")?;

        match write_snapshot(&mut conn, snapshot) {
            Ok(summary) => {
                conn.execute_batch("COMMIT")
                    .context("Failed to commit import")?;
                info!(
                    "  → Imported {} players, {} matches, {} coupons\n",
                    summary.players, summary.matches, summary.coupons
                );
                Ok(summary)
            }
            Err(e) => {
                if let Err(rollback) = conn.execute_batch("ROLLBACK") {
                    log::error!("Rollback after failed import also failed: {}", rollback);
                }
                Err(e)
            }
        }
    }
}

fn write_snapshot(conn: &mut DbConn, snapshot: &TournamentSnapshot) -> Result<ImportSummary> {
    for player in &snapshot.players {
        database::players::upsert_player(conn, player)?;
    }

    database::tournaments::upsert_tournament(conn, &snapshot.tournament)?;

    for m in &snapshot.matches {
        database::matches::upsert_match(conn, m)?;
    }

    for entry in &snapshot.catalog {
        database::catalog::upsert_prediction_type(conn, entry)?;
    }

    let mut predictions = 0;
    for entry in &snapshot.coupons {
        database::coupons::upsert_coupon(conn, &entry.coupon)?;
        for prediction in &entry.predictions {
            database::coupons::upsert_prediction(conn, prediction)?;
        }
        predictions += entry.predictions.len();
    }

    Ok(ImportSummary {
        tournament_id: snapshot.tournament.id,
        players: snapshot.players.len(),
        matches: snapshot.matches.len(),
        prediction_types: snapshot.catalog.len(),
        coupons: snapshot.coupons.len(),
        predictions,
    })
}
