pub mod catalog;
pub mod settings;

pub use catalog::default_catalog;
pub use settings::{AppConfig, BettingSettings, ServerSettings};
