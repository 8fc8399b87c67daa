use std::collections::HashMap;

use log::debug;

use crate::betting::{PredictionKind, PredictionValue};
use crate::domain::{
    BettingAchievement, BettingAchievementType, PlayerId, ScoredCoupon, TournamentId,
};
use crate::errors::{EngineError, EngineResult};

/// Decides which coupons of a tournament pool earn `dark_horse`
pub trait DarkHorsePolicy {
    fn is_dark_horse(&self, coupon: &ScoredCoupon, pool: &[&ScoredCoupon]) -> bool;
}

/// A coupon is a dark horse when it correctly named the tournament winner
/// and at most `max_pick_share` of the pool's winner picks agreed with it.
#[derive(Debug, Clone, Copy)]
pub struct ContrarianWinnerPick {
    pub max_pick_share: f64,
}

impl Default for ContrarianWinnerPick {
    fn default() -> Self {
        Self {
            max_pick_share: 0.25,
        }
    }
}

impl DarkHorsePolicy for ContrarianWinnerPick {
    fn is_dark_horse(&self, coupon: &ScoredCoupon, pool: &[&ScoredCoupon]) -> bool {
        let Some(pick) = winner_pick(coupon, true) else {
            return false;
        };

        let picks: Vec<PlayerId> = pool.iter().filter_map(|c| winner_pick(c, false)).collect();
        if picks.is_empty() {
            return false;
        }
        let same = picks.iter().filter(|&&p| p == pick).count();
        let share = same as f64 / picks.len() as f64;
        share <= self.max_pick_share
    }
}

/// The coupon's tournament_winner pick, optionally only when it was correct
fn winner_pick(coupon: &ScoredCoupon, correct_only: bool) -> Option<PlayerId> {
    coupon
        .predictions
        .iter()
        .filter(|p| p.prediction_type == PredictionKind::TournamentWinner.key())
        .filter(|p| !correct_only || p.is_correct == Some(true))
        .find_map(|p| match PredictionValue::decode(p).ok()? {
            (_, PredictionValue::Player(_, id)) => Some(id),
            _ => None,
        })
}

#[derive(Debug, Clone, Copy)]
pub struct AwardRules {
    pub perfect_predictor_min_predictions: u32,
}

impl Default for AwardRules {
    fn default() -> Self {
        Self {
            perfect_predictor_min_predictions: 1,
        }
    }
}

/// Derives the betting achievements of one tournament's coupon pool.
///
/// Only submitted coupons compete. Ties for the highest total all receive
/// `gambling_king`; a pool where nobody scored has no king.
pub fn derive_betting_achievements(
    tournament_id: TournamentId,
    coupons: &[ScoredCoupon],
    rules: &AwardRules,
    dark_horse: &dyn DarkHorsePolicy,
) -> EngineResult<Vec<BettingAchievement>> {
    if let Some(foreign) = coupons.iter().find(|c| c.coupon.tournament_id != tournament_id) {
        return Err(EngineError::MixedTournaments {
            expected: tournament_id,
            found: foreign.coupon.tournament_id,
        });
    }

    let mut pool: Vec<&ScoredCoupon> = coupons.iter().filter(|c| c.coupon.is_submitted).collect();
    pool.sort_by_key(|c| c.coupon.id);

    let mut awards = Vec::new();
    awards.extend(gambling_kings(tournament_id, &pool));
    awards.extend(
        pool.iter()
            .filter(|c| dark_horse.is_dark_horse(c, &pool))
            .map(|c| build(tournament_id, c, BettingAchievementType::DarkHorse)),
    );
    awards.extend(
        pool.iter()
            .filter(|c| is_perfect(c, rules))
            .map(|c| build(tournament_id, c, BettingAchievementType::PerfectPredictor)),
    );

    debug!(
        "Tournament {}: {} betting achievements from {} coupons",
        tournament_id,
        awards.len(),
        pool.len()
    );
    Ok(awards)
}

fn gambling_kings(tournament_id: TournamentId, pool: &[&ScoredCoupon]) -> Vec<BettingAchievement> {
    let best = pool.iter().map(|c| c.total_points).max().unwrap_or(0);
    if best == 0 {
        return Vec::new();
    }
    pool.iter()
        .filter(|c| c.total_points == best)
        .map(|c| build(tournament_id, c, BettingAchievementType::GamblingKing))
        .collect()
}

fn is_perfect(coupon: &ScoredCoupon, rules: &AwardRules) -> bool {
    coupon.total_predictions() >= rules.perfect_predictor_min_predictions.max(1)
        && coupon.correct_predictions() == coupon.total_predictions()
}

fn build(
    tournament_id: TournamentId,
    coupon: &ScoredCoupon,
    achievement_type: BettingAchievementType,
) -> BettingAchievement {
    BettingAchievement {
        tournament_id,
        player_id: coupon.coupon.player_id,
        coupon_id: coupon.coupon.id,
        achievement_type,
        points_earned: coupon.total_points,
    }
}

/// Award counts per player and type across any number of tournaments
pub fn count_awards(
    awards: &[BettingAchievement],
) -> HashMap<(PlayerId, BettingAchievementType), u32> {
    let mut counts = HashMap::new();
    for award in awards {
        *counts
            .entry((award.player_id, award.achievement_type))
            .or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BettingCoupon, BettingPrediction};

    fn scored(id: i64, player_id: PlayerId, winner_pick: PlayerId, correct: bool, points: u32) -> ScoredCoupon {
        let prediction = BettingPrediction {
            id: id * 10,
            coupon_id: id,
            prediction_type: "tournament_winner".to_string(),
            prediction_value: winner_pick.to_string(),
            points_awarded: points,
            is_correct: Some(correct),
        };
        ScoredCoupon {
            coupon: BettingCoupon {
                id,
                tournament_id: 1,
                player_id,
                name: format!("coupon {}", id),
                is_submitted: true,
                total_points: points,
            },
            predictions: vec![prediction],
            total_points: points,
        }
    }

    fn kinds_for(awards: &[BettingAchievement], kind: BettingAchievementType) -> Vec<i64> {
        awards
            .iter()
            .filter(|a| a.achievement_type == kind)
            .map(|a| a.coupon_id)
            .collect()
    }

    #[test]
    fn test_gambling_king_ties_all_awarded() {
        let pool = vec![scored(1, 1, 9, true, 5), scored(2, 2, 9, true, 5), scored(3, 3, 8, false, 0)];
        let awards =
            derive_betting_achievements(1, &pool, &AwardRules::default(), &ContrarianWinnerPick::default())
                .unwrap();
        assert_eq!(kinds_for(&awards, BettingAchievementType::GamblingKing), vec![1, 2]);
        assert_eq!(kinds_for(&awards, BettingAchievementType::PerfectPredictor), vec![1, 2]);
    }

    #[test]
    fn test_no_king_when_nobody_scores() {
        let pool = vec![scored(1, 1, 9, false, 0)];
        let awards =
            derive_betting_achievements(1, &pool, &AwardRules::default(), &ContrarianWinnerPick::default())
                .unwrap();
        assert!(kinds_for(&awards, BettingAchievementType::GamblingKing).is_empty());
    }

    #[test]
    fn test_dark_horse_requires_contrarian_correct_pick() {
        // Four coupons back player 8, one backs the actual winner 9
        let mut pool: Vec<ScoredCoupon> = (1..=4).map(|i| scored(i, i, 8, false, 0)).collect();
        pool.push(scored(5, 5, 9, true, 5));
        let awards =
            derive_betting_achievements(1, &pool, &AwardRules::default(), &ContrarianWinnerPick::default())
                .unwrap();
        assert_eq!(kinds_for(&awards, BettingAchievementType::DarkHorse), vec![5]);
    }

    #[test]
    fn test_popular_correct_pick_is_not_dark_horse() {
        let pool = vec![scored(1, 1, 9, true, 5), scored(2, 2, 9, true, 5), scored(3, 3, 8, false, 0)];
        let policy = ContrarianWinnerPick { max_pick_share: 0.5 };
        let awards = derive_betting_achievements(1, &pool, &AwardRules::default(), &policy).unwrap();
        assert!(kinds_for(&awards, BettingAchievementType::DarkHorse).is_empty());
    }

    #[test]
    fn test_unsubmitted_coupons_do_not_compete() {
        let mut draft = scored(1, 1, 9, true, 5);
        draft.coupon.is_submitted = false;
        let awards = derive_betting_achievements(
            1,
            &[draft],
            &AwardRules::default(),
            &ContrarianWinnerPick::default(),
        )
        .unwrap();
        assert!(awards.is_empty());
    }

    #[test]
    fn test_count_awards() {
        let pool = vec![scored(1, 1, 9, true, 5)];
        let awards =
            derive_betting_achievements(1, &pool, &AwardRules::default(), &ContrarianWinnerPick::default())
                .unwrap();
        let counts = count_awards(&awards);
        assert_eq!(counts.get(&(1, BettingAchievementType::GamblingKing)), Some(&1));
    }
}
