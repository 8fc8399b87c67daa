use std::collections::BTreeMap;

use super::awards::count_awards;
use crate::domain::{BettingAchievement, BettingAchievementType, BettingPlayerStats, PlayerId, ScoredCoupon};

/// Percentage with two decimals; 0 when nothing was predicted
pub fn accuracy_percentage(correct: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = correct as f64 / total as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

/// Lifetime betting stats per coupon owner, ordered by player id.
/// Only submitted coupons count.
pub fn compute_player_stats(
    coupons: &[ScoredCoupon],
    awards: &[BettingAchievement],
) -> Vec<BettingPlayerStats> {
    let mut by_player: BTreeMap<PlayerId, Vec<&ScoredCoupon>> = BTreeMap::new();
    for coupon in coupons.iter().filter(|c| c.coupon.is_submitted) {
        by_player.entry(coupon.coupon.player_id).or_default().push(coupon);
    }

    let award_counts = count_awards(awards);
    let count = |player_id: PlayerId, kind: BettingAchievementType| {
        award_counts.get(&(player_id, kind)).copied().unwrap_or(0)
    };

    by_player
        .into_iter()
        .map(|(player_id, owned)| {
            let correct: u32 = owned.iter().map(|c| c.correct_predictions()).sum();
            let total: u32 = owned.iter().map(|c| c.total_predictions()).sum();
            BettingPlayerStats {
                player_id,
                total_coupons: owned.len() as u32,
                total_points: owned.iter().map(|c| c.total_points).sum(),
                correct_predictions: correct,
                total_predictions: total,
                accuracy_percentage: accuracy_percentage(correct, total),
                best_coupon_score: owned.iter().map(|c| c.total_points).max().unwrap_or(0),
                gambling_king_count: count(player_id, BettingAchievementType::GamblingKing),
                dark_horse_count: count(player_id, BettingAchievementType::DarkHorse),
            }
        })
        .collect()
}
