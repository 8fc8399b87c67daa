use std::cmp::Ordering;
use std::collections::HashMap;

use log::info;

use super::stats::compute_player_stats;
use crate::domain::{BettingPlayerStats, BettingRankingEntry, PlayerId, Roster, ScoredCoupon};
use crate::errors::EngineResult;

/// Builds the betting leaderboard.
///
/// Every owner of a submitted coupon gets a row. Supplied stats win over
/// stats derived from `coupons`; owners without supplied stats are derived
/// from their coupons with zero award counts. Rows are ordered by total
/// points, then accuracy, then nickname, and numbered 1..n.
pub fn aggregate_rankings(
    coupons: &[ScoredCoupon],
    stats: &[BettingPlayerStats],
    roster: &Roster,
) -> EngineResult<Vec<BettingRankingEntry>> {
    let mut merged: HashMap<PlayerId, BettingPlayerStats> = compute_player_stats(coupons, &[])
        .into_iter()
        .map(|s| (s.player_id, s))
        .collect();
    for s in stats {
        merged.insert(s.player_id, s.clone());
    }

    let mut entries = merged
        .into_values()
        .map(|s| build_entry(s, roster))
        .collect::<EngineResult<Vec<_>>>()?;

    entries.sort_by(compare_rows);
    for (idx, entry) in entries.iter_mut().enumerate() {
        entry.position = idx as u32 + 1;
    }

    info!("Betting leaderboard built for {} players", entries.len());
    Ok(entries)
}

fn build_entry(stats: BettingPlayerStats, roster: &Roster) -> EngineResult<BettingRankingEntry> {
    Ok(BettingRankingEntry {
        position: 0,
        player_id: stats.player_id,
        nickname: roster.nickname(stats.player_id)?.to_string(),
        total_points: stats.total_points,
        accuracy_percentage: stats.accuracy_percentage,
        total_coupons: stats.total_coupons,
        best_coupon_score: stats.best_coupon_score,
        gambling_king_count: stats.gambling_king_count,
        dark_horse_count: stats.dark_horse_count,
    })
}

fn compare_rows(a: &BettingRankingEntry, b: &BettingRankingEntry) -> Ordering {
    b.total_points
        .cmp(&a.total_points)
        .then_with(|| b.accuracy_percentage.total_cmp(&a.accuracy_percentage))
        .then_with(|| a.nickname.cmp(&b.nickname))
        .then_with(|| a.player_id.cmp(&b.player_id))
}
