use std::sync::Arc;

use crate::services::{
    providers::{InventoryStore, WeatherProvider},
    EngineSettings, OutfitRecommender,
};

/// Shared application state
///
/// Holds no per-user data: every request reads the inventory store afresh.
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<OutfitRecommender>,
}

impl AppState {
    pub fn new(
        inventory: Arc<dyn InventoryStore>,
        weather: Arc<dyn WeatherProvider>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            recommender: Arc::new(OutfitRecommender::new(inventory, weather, settings)),
        }
    }
}
