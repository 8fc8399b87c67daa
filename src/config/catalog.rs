use crate::betting::PredictionKind;
use crate::domain::BettingPredictionType;

/// Prediction types seeded into a fresh database
pub fn default_catalog() -> Vec<BettingPredictionType> {
    vec![
        entry(PredictionKind::FinalRanking, "Final ranking", 10),
        entry(PredictionKind::TournamentWinner, "Tournament winner", 5),
        entry(PredictionKind::TopScorer, "Top scorer", 3),
        entry(PredictionKind::DefensiveLeader, "Best defence", 3),
        entry(PredictionKind::MostConceded, "Leakiest defence", 2),
        entry(PredictionKind::KingOfEmotions, "King of emotions", 2),
        entry(PredictionKind::TotalGoals, "Total goals over/under", 2),
    ]
}

fn entry(kind: PredictionKind, display_name: &str, points_for_correct: u32) -> BettingPredictionType {
    BettingPredictionType {
        key: kind.key().to_string(),
        display_name: display_name.to_string(),
        points_for_correct,
        is_active: true,
    }
}
