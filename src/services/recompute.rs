use std::sync::{Arc, PoisonError};

use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use serde::Serialize;

use super::locks::TournamentLocks;
use crate::achievements::evaluate_achievements;
use crate::betting::{ensure_resolved, score_coupon_against, unscorable_types, RealizedOutcome};
use crate::config::BettingSettings;
use crate::database::{self, DbPool};
use crate::domain::{
    Achievement, BettingAchievement, LeagueTableEntry, Match, ScoredCoupon, Tournament,
    TournamentId,
};
use crate::ranking::{compute_player_stats, derive_betting_achievements};
use crate::standings::compute_league_table;

/// Counts of what a recompute wrote
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecomputeSummary {
    pub tournament_id: TournamentId,
    pub table_rows: usize,
    pub achievements: usize,
    pub resolved: bool,
    pub scored_coupons: usize,
    pub betting_achievements: usize,
}

/// Standings and achievements derived from stored matches, not persisted
#[derive(Debug, Clone, Serialize)]
pub struct TournamentPreview {
    pub tournament: Tournament,
    pub standings: Vec<LeagueTableEntry>,
    pub achievements: Vec<Achievement>,
    pub resolved: bool,
}

struct Derived {
    table: Vec<LeagueTableEntry>,
    achievements: Vec<Achievement>,
    scored: Option<Vec<ScoredCoupon>>,
    awards: Vec<BettingAchievement>,
}

pub struct RecomputeService {
    pool: DbPool,
    betting: BettingSettings,
    locks: Arc<TournamentLocks>,
}

impl RecomputeService {
    pub fn new(pool: DbPool, betting: BettingSettings, locks: Arc<TournamentLocks>) -> Self {
        Self {
            pool,
            betting,
            locks,
        }
    }

    /// Rebuilds every derived row of one tournament, then the global player stats.
    ///
    /// Reads, writes and the stats refresh share one `BEGIN IMMEDIATE`
    /// transaction; nothing is stored unless all of it succeeds.
    pub fn recompute_tournament(&self, tournament_id: TournamentId) -> Result<RecomputeSummary> {
        let handle = self.locks.handle(tournament_id);
        let _guard = handle.lock().unwrap_or_else(PoisonError::into_inner);

        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .context("Failed to begin recompute transaction")?;

        let summary = self.recompute_in(&tx, tournament_id)?;
        refresh_player_stats(&tx)?;

        tx.commit()
            .with_context(|| format!("Failed to commit recompute of tournament {}", tournament_id))?;
        Ok(summary)
    }

    /// Recomputes tournaments one by one; each commits on its own
    pub fn recompute_all(&self) -> Result<Vec<RecomputeSummary>> {
        let tournaments = {
            let conn = database::get_connection(&self.pool)?;
            database::tournaments::list_all(&conn)?
        };
        info!("=== Recomputing {} tournaments ===\n", tournaments.len());

        let summaries = tournaments
            .iter()
            .map(|t| self.recompute_tournament(t.id))
            .collect::<Result<Vec<_>>>()?;

        info!("=== Recompute Complete ===");
        Ok(summaries)
    }

    /// Runs standings and achievements on the stored matches without writing
    pub fn preview(&self, tournament_id: TournamentId) -> Result<TournamentPreview> {
        let conn = database::get_connection(&self.pool)?;
        let tournament = find_tournament(&conn, tournament_id)?;
        let matches = database::matches::list_by_tournament(&conn, tournament_id)?;
        let roster = database::players::load_roster(&conn)?;

        let standings = compute_league_table(&matches, &roster)
            .with_context(|| format!("Invalid matches in tournament {}", tournament_id))?;
        let achievements = evaluate_achievements(tournament_id, &matches, &standings)?;

        Ok(TournamentPreview {
            tournament,
            standings,
            achievements,
            resolved: ensure_resolved(tournament_id, &matches).is_ok(),
        })
    }

    fn recompute_in(
        &self,
        tx: &Transaction<'_>,
        tournament_id: TournamentId,
    ) -> Result<RecomputeSummary> {
        let tournament = find_tournament(tx, tournament_id)?;
        info!("=== Recomputing tournament {} ({}) ===", tournament.id, tournament.name);

        let matches = database::matches::list_by_tournament(tx, tournament_id)?;
        let derived = self.derive(tx, tournament_id, &matches)?;

        database::standings::replace_league_table(tx, tournament_id, &derived.table)?;
        info!("  → Stored {} table rows", derived.table.len());

        database::achievements::replace_achievements(tx, tournament_id, &derived.achievements)?;
        info!("  → Stored {} achievements", derived.achievements.len());

        // Drafts and reopened tournaments end up unscored
        database::coupons::clear_scores(tx, tournament_id)?;
        let scored_coupons = match &derived.scored {
            Some(scored) => {
                database::coupons::save_scores(tx, scored)?;
                info!("  → Scored {} submitted coupons", scored.len());
                scored.len()
            }
            None => {
                info!("  → Tournament not resolved, coupon scores cleared");
                0
            }
        };

        database::betting::replace_betting_achievements(tx, tournament_id, &derived.awards)?;
        info!("  → Stored {} betting achievements\n", derived.awards.len());

        Ok(RecomputeSummary {
            tournament_id,
            table_rows: derived.table.len(),
            achievements: derived.achievements.len(),
            resolved: derived.scored.is_some(),
            scored_coupons,
            betting_achievements: derived.awards.len(),
        })
    }

    /// Computes everything before the first write, so an invalid coupon or
    /// match leaves the stored rows untouched
    fn derive(
        &self,
        conn: &Connection,
        tournament_id: TournamentId,
        matches: &[Match],
    ) -> Result<Derived> {
        let roster = database::players::load_roster(conn)?;

        // Step 1: League table
        let table = compute_league_table(matches, &roster)
            .with_context(|| format!("Invalid matches in tournament {}", tournament_id))?;

        // Step 2: Achievements
        let achievements = evaluate_achievements(tournament_id, matches, &table)?;

        // Step 3: Coupons, only once every match is played
        if ensure_resolved(tournament_id, matches).is_err() {
            return Ok(Derived {
                table,
                achievements,
                scored: None,
                awards: Vec::new(),
            });
        }

        let catalog = database::catalog::list_all(conn)?;
        let outcome = RealizedOutcome::new(tournament_id, &table, &achievements)?;
        let coupons = database::coupons::list_by_tournament(conn, tournament_id)?;

        let mut scored = Vec::new();
        for (coupon, predictions) in coupons.iter().filter(|(c, _)| c.is_submitted) {
            let skipped = unscorable_types(predictions, &catalog);
            if !skipped.is_empty() {
                warn!(
                    "Coupon {} has predictions of inactive or uncatalogued types: {}",
                    coupon.id,
                    skipped.join(", ")
                );
            }
            let result = score_coupon_against(coupon, predictions, &outcome, &catalog)
                .with_context(|| format!("Failed to score coupon {}", coupon.id))?;
            scored.push(result);
        }

        // Step 4: Betting achievements
        let awards = derive_betting_achievements(
            tournament_id,
            &scored,
            &self.betting.award_rules(),
            &self.betting.dark_horse_policy(),
        )?;

        Ok(Derived {
            table,
            achievements,
            scored: Some(scored),
            awards,
        })
    }

}

/// Rebuilds lifetime stats from every scored coupon and stored award
fn refresh_player_stats(tx: &Transaction<'_>) -> Result<()> {
    let coupons = scored_coupons(tx)?;
    let awards = database::betting::list_betting_achievements(tx)?;

    let stats = compute_player_stats(&coupons, &awards);
    database::betting::replace_player_stats(tx, &stats)?;
    info!("  → Refreshed betting stats for {} players", stats.len());
    Ok(())
}

/// Stored coupons whose predictions all carry a scoring result
pub fn scored_coupons(conn: &Connection) -> Result<Vec<ScoredCoupon>> {
    let mut coupons = database::coupons::list_all_scored(conn)?;
    coupons.retain(|c| c.predictions.iter().all(|p| p.is_correct.is_some()));
    Ok(coupons)
}

fn find_tournament(conn: &Connection, tournament_id: TournamentId) -> Result<Tournament> {
    database::tournaments::find_by_id(conn, tournament_id)?
        .ok_or_else(|| anyhow!("Tournament {} not found", tournament_id))
}
