use crate::ranking::{AwardRules, ContrarianWinnerPick};

#[derive(Debug, Clone)]
pub struct BettingSettings {
    pub dark_horse_max_pick_share: f64,
    pub perfect_predictor_min_predictions: u32,
}

impl Default for BettingSettings {
    fn default() -> Self {
        Self {
            dark_horse_max_pick_share: 0.25,
            perfect_predictor_min_predictions: 1,
        }
    }
}

impl BettingSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            dark_horse_max_pick_share: env_parse("DARK_HORSE_MAX_PICK_SHARE")
                .unwrap_or(defaults.dark_horse_max_pick_share),
            perfect_predictor_min_predictions: env_parse("PERFECT_PREDICTOR_MIN_PREDICTIONS")
                .unwrap_or(defaults.perfect_predictor_min_predictions),
        }
    }

    pub fn dark_horse_policy(&self) -> ContrarianWinnerPick {
        ContrarianWinnerPick {
            max_pick_share: self.dark_horse_max_pick_share,
        }
    }

    pub fn award_rules(&self) -> AwardRules {
        AwardRules {
            perfect_predictor_min_predictions: self.perfect_predictor_min_predictions,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ServerSettings {
    /// Bearer token for admin endpoints; admin routes reject everything when unset
    pub admin_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: String,
    pub betting: BettingSettings,
    pub server: ServerSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: "league_scoring.db".to_string(),
            betting: BettingSettings::default(),
            server: ServerSettings::default(),
        }
    }
}

impl AppConfig {
    /// Defaults overridden by `DATABASE_PATH`, `ADMIN_TOKEN`,
    /// `DARK_HORSE_MAX_PICK_SHARE` and `PERFECT_PREDICTOR_MIN_PREDICTIONS`
    pub fn new() -> Self {
        let defaults = Self::default();
        Self {
            database_path: std::env::var("DATABASE_PATH").unwrap_or(defaults.database_path),
            betting: BettingSettings::from_env(),
            server: ServerSettings {
                admin_token: std::env::var("ADMIN_TOKEN").ok().filter(|t| !t.is_empty()),
            },
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring unparsable {}={}", key, raw);
            None
        }
    }
}
