use std::time::Duration;

pub mod catalog;
pub mod constraints;
pub mod event_taxonomy;
pub mod generator;
pub mod providers;
pub mod recommendations;
pub mod scorer;

pub use recommendations::{OutfitRecommender, WeatherInput};

use generator::DEFAULT_CANDIDATE_COUNT;
use scorer::RankingMode;

/// Engine knobs, independent of server configuration
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Candidates generated when the caller does not ask for a count
    pub candidate_count: usize,
    /// 1 = sequential generation
    pub generation_workers: usize,
    pub ranking_mode: RankingMode,
    /// Only applied in scored mode
    pub top_k: Option<usize>,
    /// Fixed seed; `None` seeds every call from entropy
    pub rng_seed: Option<u64>,
    /// Bound on the current-conditions lookup
    pub weather_timeout: Duration,
    /// Separate, best-effort bound on the forecast lookup
    pub forecast_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            candidate_count: DEFAULT_CANDIDATE_COUNT,
            generation_workers: 1,
            ranking_mode: RankingMode::Generation,
            top_k: None,
            rng_seed: None,
            weather_timeout: Duration::from_secs(5),
            forecast_timeout: Duration::from_secs(2),
        }
    }
}
