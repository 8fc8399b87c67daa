use std::collections::HashMap;

use log::debug;

use super::outcome::{comparator, RealizedOutcome};
use super::predictions::PredictionValue;
use crate::domain::{
    Achievement, BettingCoupon, BettingPrediction, BettingPredictionType, LeagueTableEntry, Match,
    ScoredCoupon, TournamentId,
};
use crate::errors::{EngineError, EngineResult};

/// Fails unless every match of the tournament is completed.
/// A tournament without matches is not resolved either.
pub fn ensure_resolved(tournament_id: TournamentId, matches: &[Match]) -> EngineResult<()> {
    if matches.is_empty() || matches.iter().any(|m| !m.is_completed) {
        return Err(EngineError::TournamentNotResolved(tournament_id));
    }
    Ok(())
}

/// Scores one coupon against the realized outcome of its tournament.
///
/// `table` and `achievements` must belong to the coupon's tournament. Every prediction is decoded first, so a coupon either scores completely or
/// fails without a partial result. Predictions whose type is missing from the
/// catalog or inactive get 0 points and `is_correct = Some(false)`.
pub fn score_coupon(
    coupon: &BettingCoupon,
    predictions: &[BettingPrediction],
    table: &[LeagueTableEntry],
    achievements: &[Achievement],
    catalog: &[BettingPredictionType],
) -> EngineResult<ScoredCoupon> {
    let outcome = RealizedOutcome::new(coupon.tournament_id, table, achievements)?;
    score_coupon_against(coupon, predictions, &outcome, catalog)
}

/// Same as [`score_coupon`] with a prebuilt outcome, for scoring a whole pool
pub fn score_coupon_against(
    coupon: &BettingCoupon,
    predictions: &[BettingPrediction],
    outcome: &RealizedOutcome,
    catalog: &[BettingPredictionType],
) -> EngineResult<ScoredCoupon> {
    if coupon.tournament_id != outcome.tournament_id() {
        return Err(EngineError::MixedTournaments {
            expected: outcome.tournament_id(),
            found: coupon.tournament_id,
        });
    }

    let catalog: HashMap<&str, &BettingPredictionType> =
        catalog.iter().map(|t| (t.key.as_str(), t)).collect();

    // 1. Decode and check ownership of every prediction
    let decoded = predictions
        .iter()
        .map(|p| {
            if p.coupon_id != coupon.id {
                return Err(EngineError::CouponMismatch {
                    prediction_id: p.id,
                    expected: coupon.id,
                    actual: p.coupon_id,
                });
            }
            PredictionValue::decode(p)
        })
        .collect::<EngineResult<Vec<_>>>()?;

    // 2. Score each against the outcome
    let scored: Vec<BettingPrediction> = predictions
        .iter()
        .zip(decoded)
        .map(|(prediction, (kind, value))| {
            let (points, correct) = match catalog.get(kind.key()) {
                Some(entry) if entry.is_active => {
                    let correct = comparator(kind)(&value, outcome);
                    (if correct { entry.points_for_correct } else { 0 }, correct)
                }
                _ => (0, false),
            };
            BettingPrediction {
                points_awarded: points,
                is_correct: Some(correct),
                ..prediction.clone()
            }
        })
        .collect();

    // 3. Coupon total
    let total_points = scored.iter().map(|p| p.points_awarded).sum();
    debug!(
        "Coupon {} ({} predictions) scored {} points",
        coupon.id,
        scored.len(),
        total_points
    );

    Ok(ScoredCoupon {
        coupon: BettingCoupon {
            total_points,
            ..coupon.clone()
        },
        predictions: scored,
        total_points,
    })
}

/// Catalog keys referenced by `predictions` that are missing or inactive
pub fn unscorable_types<'a>(
    predictions: &'a [BettingPrediction],
    catalog: &[BettingPredictionType],
) -> Vec<&'a str> {
    let mut keys: Vec<&str> = predictions
        .iter()
        .map(|p| p.prediction_type.as_str())
        .filter(|key| !catalog.iter().any(|t| t.key == *key && t.is_active))
        .collect();
    keys.sort_unstable();
    keys.dedup();
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::evaluate_achievements;
    use crate::domain::{Player, Roster};
    use crate::standings::compute_league_table;

    fn roster() -> Roster {
        Roster::new(
            [(1, "ana"), (2, "bob"), (3, "cid")]
                .into_iter()
                .map(|(id, nick)| Player { id, nickname: nick.to_string() }),
        )
    }

    fn played(id: i64, p1: i64, p2: i64, s1: i32, s2: i32) -> Match {
        Match {
            id,
            tournament_id: 1,
            player1_id: p1,
            player2_id: p2,
            team1_id: None,
            team2_id: None,
            player1_score: Some(s1),
            player2_score: Some(s2),
            is_completed: true,
        }
    }

    fn catalog() -> Vec<BettingPredictionType> {
        [
            ("final_ranking", 10, true),
            ("tournament_winner", 5, true),
            ("top_scorer", 3, true),
            ("defensive_leader", 3, true),
            ("most_conceded", 2, false),
            ("total_goals", 2, true),
        ]
        .into_iter()
        .map(|(key, points, active)| BettingPredictionType {
            key: key.to_string(),
            display_name: key.replace('_', " "),
            points_for_correct: points,
            is_active: active,
        })
        .collect()
    }

    fn coupon() -> BettingCoupon {
        BettingCoupon {
            id: 100,
            tournament_id: 1,
            player_id: 3,
            name: "my picks".to_string(),
            is_submitted: true,
            total_points: 0,
        }
    }

    fn prediction(id: i64, key: &str, value: &str) -> BettingPrediction {
        BettingPrediction {
            id,
            coupon_id: 100,
            prediction_type: key.to_string(),
            prediction_value: value.to_string(),
            points_awarded: 0,
            is_correct: None,
        }
    }

    fn outcome_inputs(matches: &[Match]) -> (Vec<LeagueTableEntry>, Vec<Achievement>) {
        let table = compute_league_table(matches, &roster()).unwrap();
        let achievements = evaluate_achievements(1, matches, &table).unwrap();
        (table, achievements)
    }

    #[test]
    fn test_scores_correct_and_incorrect() {
        let (table, achievements) = outcome_inputs(&[played(1, 1, 2, 3, 1)]);
        let predictions = vec![
            prediction(1, "tournament_winner", "1"),
            prediction(2, "top_scorer", "2"),
            prediction(3, "final_ranking", "[1, 2]"),
        ];
        let scored = score_coupon(&coupon(), &predictions, &table, &achievements, &catalog()).unwrap();

        let flags: Vec<_> = scored.predictions.iter().map(|p| (p.points_awarded, p.is_correct)).collect();
        assert_eq!(flags, vec![(5, Some(true)), (0, Some(false)), (10, Some(true))]);
        assert_eq!(scored.total_points, 15);
        assert_eq!(scored.coupon.total_points, 15);
    }

    #[test]
    fn test_tied_top_scorer_any_holder_counts() {
        let (table, achievements) = outcome_inputs(&[played(1, 1, 2, 2, 2)]);
        for pick in ["1", "2"] {
            let predictions = vec![prediction(1, "top_scorer", pick)];
            let scored =
                score_coupon(&coupon(), &predictions, &table, &achievements, &catalog()).unwrap();
            assert_eq!(scored.predictions[0].is_correct, Some(true));
            assert_eq!(scored.total_points, 3);
        }
    }

    #[test]
    fn test_winner_pick_tied_for_first_is_correct() {
        // ana and bob draw, both beat cid by the same score: tied on points, GD and GF
        let matches = vec![played(1, 1, 2, 1, 1), played(2, 1, 3, 2, 0), played(3, 2, 3, 2, 0)];
        let (table, achievements) = outcome_inputs(&matches);
        assert_eq!(table[0].player_id, 1);

        let predictions = vec![prediction(1, "tournament_winner", "2")];
        let scored = score_coupon(&coupon(), &predictions, &table, &achievements, &catalog()).unwrap();
        assert_eq!(scored.predictions[0].is_correct, Some(true));
        assert_eq!(scored.total_points, 5);
    }

    #[test]
    fn test_inactive_and_uncatalogued_types_score_zero() {
        let (table, achievements) = outcome_inputs(&[played(1, 1, 2, 3, 1)]);
        let predictions = vec![
            prediction(1, "most_conceded", "2"),
            prediction(2, "king_of_emotions", "1"),
        ];
        let scored = score_coupon(&coupon(), &predictions, &table, &achievements, &catalog()).unwrap();
        assert!(scored.predictions.iter().all(|p| p.points_awarded == 0 && p.is_correct == Some(false)));
        assert_eq!(
            unscorable_types(&predictions, &catalog()),
            vec!["king_of_emotions", "most_conceded"]
        );
    }

    #[test]
    fn test_unknown_type_fails_whole_coupon() {
        let (table, achievements) = outcome_inputs(&[played(1, 1, 2, 3, 1)]);
        let predictions = vec![
            prediction(1, "tournament_winner", "1"),
            prediction(2, "golden_boot", "1"),
        ];
        let result = score_coupon(&coupon(), &predictions, &table, &achievements, &catalog());
        assert!(matches!(result, Err(EngineError::UnknownPredictionType { prediction_id: 2, .. })));
    }

    #[test]
    fn test_foreign_prediction_rejected() {
        let mut foreign = prediction(9, "top_scorer", "1");
        foreign.coupon_id = 5;
        let result = score_coupon(&coupon(), &[foreign], &[], &[], &catalog());
        assert_eq!(
            result,
            Err(EngineError::CouponMismatch { prediction_id: 9, expected: 100, actual: 5 })
        );
    }

    #[test]
    fn test_coupon_from_another_tournament_rejected() {
        let (table, achievements) = outcome_inputs(&[played(1, 1, 2, 3, 1)]);
        let mut foreign = coupon();
        foreign.tournament_id = 2;
        let predictions = vec![prediction(1, "tournament_winner", "1")];

        let result = score_coupon(&foreign, &predictions, &table, &achievements, &catalog());
        assert_eq!(result, Err(EngineError::MixedTournaments { expected: 2, found: 1 }));

        let outcome = RealizedOutcome::new(1, &table, &achievements).unwrap();
        let result = score_coupon_against(&foreign, &predictions, &outcome, &catalog());
        assert_eq!(result, Err(EngineError::MixedTournaments { expected: 1, found: 2 }));
    }

    #[test]
    fn test_empty_coupon_scores_zero() {
        let scored = score_coupon(&coupon(), &[], &[], &[], &catalog()).unwrap();
        assert_eq!(scored.total_points, 0);
        assert!(scored.predictions.is_empty());
    }

    #[test]
    fn test_ensure_resolved() {
        let mut pending = played(2, 2, 3, 0, 0);
        pending.player1_score = None;
        pending.player2_score = None;
        pending.is_completed = false;

        assert!(ensure_resolved(1, &[played(1, 1, 2, 1, 0)]).is_ok());
        assert_eq!(
            ensure_resolved(1, &[played(1, 1, 2, 1, 0), pending]),
            Err(EngineError::TournamentNotResolved(1))
        );
        assert_eq!(ensure_resolved(1, &[]), Err(EngineError::TournamentNotResolved(1)));
    }
}
