use std::sync::Arc;
use std::time::Instant;

use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        ConstraintSet, Garment, Location, OutfitCandidate, OutfitFilters, Recommendation,
        WeatherSnapshot,
    },
    services::{
        catalog, constraints,
        generator::{self, CandidateGenerator},
        providers::{InventoryFilter, InventoryStore, WeatherProvider},
        scorer, EngineSettings,
    },
};

/// Candidates from the generic entry point, with the filters echoed back
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedOutfits {
    pub outfits: Vec<OutfitCandidate>,
    pub filters: OutfitFilters,
}

/// Candidates from the weather entry point
#[derive(Debug, Clone, Serialize)]
pub struct WeatherOutfits {
    pub outfits: Vec<OutfitCandidate>,
    pub weather: WeatherSnapshot,
    pub recommendation: Recommendation,
}

/// Candidates from the event entry point
#[derive(Debug, Clone, Serialize)]
pub struct EventOutfits {
    pub outfits: Vec<OutfitCandidate>,
    pub event: String,
    pub recommendation: Recommendation,
}

/// How the caller describes the weather
#[derive(Debug, Clone)]
pub enum WeatherInput {
    /// Conditions already known to the caller
    Snapshot(WeatherSnapshot),
    /// Conditions to be fetched from the weather provider
    Location(Location),
}

/// Recommendation facade
///
/// Each entry point resolves a constraint set, loads the user's wardrobe,
/// generates candidates and ranks them. Calls share no mutable state.
pub struct OutfitRecommender {
    inventory: Arc<dyn InventoryStore>,
    weather: Arc<dyn WeatherProvider>,
    settings: EngineSettings,
}

impl OutfitRecommender {
    pub fn new(
        inventory: Arc<dyn InventoryStore>,
        weather: Arc<dyn WeatherProvider>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            inventory,
            weather,
            settings,
        }
    }

    /// Generic generation from explicit filters
    pub async fn generate_outfits(
        &self,
        user_id: Uuid,
        filters: OutfitFilters,
        count: Option<usize>,
    ) -> AppResult<GeneratedOutfits> {
        let constraints = constraints::from_filters(&filters);
        let store_filter = filters
            .brand
            .as_deref()
            .map(InventoryFilter::by_brand)
            .unwrap_or_default();

        let garments = self.load_garments(user_id, &store_filter).await?;
        let outfits = self.run(user_id, &garments, &constraints, count).await?;

        Ok(GeneratedOutfits { outfits, filters })
    }

    /// Weather-driven generation
    pub async fn generate_weather_based_outfits(
        &self,
        user_id: Uuid,
        input: WeatherInput,
        count: Option<usize>,
    ) -> AppResult<WeatherOutfits> {
        let weather = match input {
            WeatherInput::Snapshot(snapshot) => snapshot,
            WeatherInput::Location(location) => self.current_weather(&location).await?,
        };

        let (constraints, recommendation) = constraints::from_weather(&weather);
        tracing::info!(
            user_id = %user_id,
            temperature = weather.temperature,
            conditions = %weather.conditions,
            styles = ?recommendation.styles,
            "Weather constraints resolved"
        );

        let garments = self.load_garments(user_id, &InventoryFilter::default()).await?;
        let outfits = self.run(user_id, &garments, &constraints, count).await?;

        Ok(WeatherOutfits {
            outfits,
            weather,
            recommendation,
        })
    }

    /// Event-driven generation; unknown events fall back to a casual profile
    pub async fn get_event_suggestions(
        &self,
        user_id: Uuid,
        event_label: &str,
        count: Option<usize>,
    ) -> AppResult<EventOutfits> {
        let (constraints, recommendation) = constraints::from_event(event_label);
        tracing::info!(
            user_id = %user_id,
            event = %event_label,
            occasions = ?recommendation.occasions,
            "Event constraints resolved"
        );

        let garments = self.load_garments(user_id, &InventoryFilter::default()).await?;
        let outfits = self.run(user_id, &garments, &constraints, count).await?;

        Ok(EventOutfits {
            outfits,
            event: event_label.to_string(),
            recommendation,
        })
    }

    /// Loads and normalizes a wardrobe; every store failure becomes `InventoryUnavailable`
    async fn load_garments(&self, user_id: Uuid, filter: &InventoryFilter) -> AppResult<Vec<Garment>> {
        let records = self
            .inventory
            .list_garments(user_id, filter)
            .await
            .map_err(|e| {
                tracing::error!(
                    user_id = %user_id,
                    store = self.inventory.name(),
                    error = %e,
                    "Inventory lookup failed"
                );
                match e {
                    AppError::InventoryUnavailable(_) => e,
                    other => AppError::InventoryUnavailable(other.to_string()),
                }
            })?;

        Ok(catalog::normalize(records))
    }

    /// Bounded weather lookup
    ///
    /// Current conditions are required: a timeout or provider error becomes
    /// `WeatherUnavailable`. The forecast then gets its own budget and any
    /// failure there only leaves the forecast empty.
    async fn current_weather(&self, location: &Location) -> AppResult<WeatherSnapshot> {
        let timeout = self.settings.weather_timeout;
        let mut snapshot =
            match tokio::time::timeout(timeout, self.weather.current_conditions(location)).await {
                Ok(Ok(snapshot)) => snapshot,
                Ok(Err(AppError::WeatherUnavailable(msg))) => {
                    return Err(AppError::WeatherUnavailable(msg))
                }
                Ok(Err(other)) => return Err(AppError::WeatherUnavailable(other.to_string())),
                Err(_) => {
                    tracing::warn!(
                        provider = self.weather.name(),
                        timeout_ms = timeout.as_millis() as u64,
                        "Weather lookup timed out"
                    );
                    return Err(AppError::WeatherUnavailable(format!(
                        "weather lookup timed out after {}ms",
                        timeout.as_millis()
                    )));
                }
            };

        let forecast_timeout = self.settings.forecast_timeout;
        match tokio::time::timeout(forecast_timeout, self.weather.forecast(location)).await {
            Ok(Ok(points)) => snapshot.forecast = points,
            Ok(Err(e)) => {
                tracing::warn!(
                    provider = self.weather.name(),
                    error = %e,
                    "Forecast unavailable, continuing with current conditions"
                );
            }
            Err(_) => {
                tracing::warn!(
                    provider = self.weather.name(),
                    timeout_ms = forecast_timeout.as_millis() as u64,
                    "Forecast lookup timed out, continuing with current conditions"
                );
            }
        }

        Ok(snapshot)
    }

    /// Generates and ranks candidates for an already-loaded wardrobe
    async fn run(
        &self,
        user_id: Uuid,
        garments: &[Garment],
        constraints: &ConstraintSet,
        count: Option<usize>,
    ) -> AppResult<Vec<OutfitCandidate>> {
        let start = Instant::now();
        let count = count.unwrap_or(self.settings.candidate_count);
        let seed = self.settings.rng_seed.unwrap_or_else(rand::random);
        let generator = CandidateGenerator::new(garments, constraints);
        let pool_size = generator.pool().len();

        let candidates = if self.settings.generation_workers > 1 && count > 1 {
            generator::generate_parallel(
                Arc::new(generator),
                count,
                self.settings.generation_workers,
                seed,
            )
            .await?
        } else {
            let mut rng = StdRng::seed_from_u64(seed);
            generator.generate(count, &mut rng)
        };

        let outfits = scorer::rank(
            candidates,
            constraints,
            self.settings.ranking_mode,
            self.settings.top_k,
        );

        tracing::info!(
            user_id = %user_id,
            wardrobe = garments.len(),
            pool_size,
            requested = count,
            returned = outfits.len(),
            processing_time_ms = start.elapsed().as_millis() as u64,
            "Outfits generated"
        );

        Ok(outfits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawGarmentRecord, Slot};
    use crate::services::providers::{MockInventoryStore, MockWeatherProvider};
    use crate::services::scorer::RankingMode;
    use crate::services::providers::HttpWeatherProvider;
    use rust_decimal::Decimal;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn record(name: &str, garment_type: &str, style: Option<&str>, seasons: &[&str], price: i64) -> RawGarmentRecord {
        RawGarmentRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            garment_type: garment_type.to_string(),
            color: Some("Blue".to_string()),
            style: style.map(str::to_string),
            brand: Some("Acme".to_string()),
            price: Some(Decimal::from(price)),
            seasons: seasons.iter().map(|s| s.to_string()).collect(),
            occasions: vec![],
        }
    }

    fn wardrobe() -> Vec<RawGarmentRecord> {
        vec![
            record("Wool sweater", "Sweater", Some("Warm"), &["Winter"], 60),
            record("Linen shirt", "Shirt", Some("Light"), &["Summer"], 30),
            record("Jeans", "Jeans", Some("Casual"), &[], 50),
            record("Boots", "Boots", None, &["Winter", "Fall"], 120),
            record("Parka", "Coat", Some("Warm"), &["Winter"], 200),
        ]
    }

    fn settings() -> EngineSettings {
        EngineSettings {
            rng_seed: Some(17),
            weather_timeout: Duration::from_millis(50),
            ..Default::default()
        }
    }

    fn inventory_with(records: Vec<RawGarmentRecord>) -> MockInventoryStore {
        let mut inventory = MockInventoryStore::new();
        inventory
            .expect_list_garments()
            .returning(move |_, _| Ok(records.clone()));
        inventory.expect_name().return_const("mock");
        inventory
    }

    fn unused_weather() -> MockWeatherProvider {
        let mut weather = MockWeatherProvider::new();
        weather.expect_current_conditions().never();
        weather.expect_name().return_const("mock");
        weather
    }

    fn recommender(inventory: MockInventoryStore, weather: MockWeatherProvider, settings: EngineSettings) -> OutfitRecommender {
        OutfitRecommender::new(Arc::new(inventory), Arc::new(weather), settings)
    }

    #[tokio::test]
    async fn test_generate_outfits_returns_default_count() {
        let engine = recommender(inventory_with(wardrobe()), unused_weather(), settings());
        let result = engine
            .generate_outfits(Uuid::new_v4(), OutfitFilters::default(), None)
            .await
            .unwrap();

        assert_eq!(result.outfits.len(), 10);
        assert_eq!(result.filters, OutfitFilters::default());
        for outfit in &result.outfits {
            assert!(outfit.garment_in(Slot::Outerwear).is_none());
            assert!(outfit.garment_in(Slot::Top).is_some());
            assert!(outfit.score.is_none());
        }
    }

    #[tokio::test]
    async fn test_empty_wardrobe_is_not_an_error() {
        let engine = recommender(inventory_with(vec![]), unused_weather(), settings());
        let result = engine
            .generate_outfits(Uuid::new_v4(), OutfitFilters::default(), Some(4))
            .await
            .unwrap();

        assert_eq!(result.outfits.len(), 4);
        assert!(result.outfits.iter().all(|o| o.is_empty()));
    }

    #[tokio::test]
    async fn test_brand_filter_is_pushed_to_store() {
        let mut inventory = MockInventoryStore::new();
        inventory
            .expect_list_garments()
            .withf(|_, filter| filter.brand.as_deref() == Some("Acme"))
            .times(1)
            .returning(|_, _| Ok(vec![]));
        inventory.expect_name().return_const("mock");

        let engine = recommender(inventory, unused_weather(), settings());
        let filters = OutfitFilters {
            brand: Some("Acme".to_string()),
            ..Default::default()
        };
        engine
            .generate_outfits(Uuid::new_v4(), filters, Some(1))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_inventory_failure_aborts_call() {
        let mut inventory = MockInventoryStore::new();
        inventory
            .expect_list_garments()
            .returning(|_, _| Err(AppError::Internal("connection refused".into())));
        inventory.expect_name().return_const("mock");

        let engine = recommender(inventory, unused_weather(), settings());
        let result = engine
            .get_event_suggestions(Uuid::new_v4(), "Formal", None)
            .await;

        assert!(matches!(result, Err(AppError::InventoryUnavailable(_))));
    }

    #[tokio::test]
    async fn test_weather_snapshot_skips_provider() {
        let engine = recommender(inventory_with(wardrobe()), unused_weather(), settings());
        let snapshot = WeatherSnapshot {
            temperature: 2.0,
            conditions: "heavy rain".to_string(),
            humidity: 95.0,
            observed_at: None,
            forecast: vec![],
        };

        let result = engine
            .generate_weather_based_outfits(Uuid::new_v4(), WeatherInput::Snapshot(snapshot), Some(20))
            .await
            .unwrap();

        assert_eq!(result.outfits.len(), 20);
        assert!(result.recommendation.styles.contains(&"Waterproof".to_string()));
        for outfit in &result.outfits {
            // Summer linen shirt fails both season and style narrowing.
            let top = outfit.garment_in(Slot::Top).unwrap();
            assert_eq!(top.name, "Wool sweater");
            assert!(outfit.garment_in(Slot::Outerwear).is_none());
        }
    }

    #[tokio::test]
    async fn test_weather_provider_is_queried_for_location() {
        let mut weather = MockWeatherProvider::new();
        weather.expect_current_conditions().times(1).returning(|_| {
            Ok(WeatherSnapshot {
                temperature: 25.0,
                conditions: "clear".to_string(),
                humidity: 40.0,
                observed_at: None,
                forecast: vec![],
            })
        });
        weather.expect_forecast().times(1).returning(|_| Ok(vec![]));
        weather.expect_name().return_const("mock");

        let engine = recommender(inventory_with(wardrobe()), weather, settings());
        let result = engine
            .generate_weather_based_outfits(
                Uuid::new_v4(),
                WeatherInput::Location(Location::City { city: "Lisbon".into() }),
                Some(5),
            )
            .await
            .unwrap();

        assert_eq!(result.recommendation.seasons, vec!["Summer", "Spring"]);
        for outfit in &result.outfits {
            assert_eq!(outfit.garment_in(Slot::Top).unwrap().name, "Linen shirt");
        }
    }

    #[tokio::test]
    async fn test_weather_failure_is_distinct() {
        let mut weather = MockWeatherProvider::new();
        weather
            .expect_current_conditions()
            .returning(|_| Err(AppError::Internal("dns".into())));
        weather.expect_name().return_const("mock");
        let mut inventory = MockInventoryStore::new();
        inventory.expect_list_garments().never();
        inventory.expect_name().return_const("mock");

        let engine = recommender(inventory, weather, settings());
        let result = engine
            .generate_weather_based_outfits(
                Uuid::new_v4(),
                WeatherInput::Location(Location::Coordinates { lat: 0.0, lon: 0.0 }),
                None,
            )
            .await;

        assert!(matches!(result, Err(AppError::WeatherUnavailable(_))));
    }

    struct SlowWeather;

    #[async_trait::async_trait]
    impl WeatherProvider for SlowWeather {
        async fn current_conditions(&self, _location: &Location) -> AppResult<WeatherSnapshot> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Err(AppError::WeatherUnavailable("unreachable".into()))
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_weather_timeout() {
        let engine = OutfitRecommender::new(
            Arc::new(inventory_with(wardrobe())),
            Arc::new(SlowWeather),
            settings(),
        );
        let result = engine
            .generate_weather_based_outfits(
                Uuid::new_v4(),
                WeatherInput::Location(Location::City { city: "Nowhere".into() }),
                None,
            )
            .await;

        match result {
            Err(AppError::WeatherUnavailable(msg)) => assert!(msg.contains("timed out")),
            other => panic!("expected timeout, got {:?}", other.map(|r| r.outfits.len())),
        }
    }

    /// Serves current conditions at once and never answers the forecast
    async fn spawn_stalling_forecast_server() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 4096];
                    let n = socket.read(&mut buf).await.unwrap_or(0);
                    let request = String::from_utf8_lossy(&buf[..n]);
                    if request.starts_with("GET /data/2.5/forecast") {
                        tokio::time::sleep(Duration::from_secs(10)).await;
                        return;
                    }
                    let body = r#"{"main":{"temp":4.0,"humidity":70},"weather":[{"main":"Rain","description":"light rain"}]}"#;
                    let response = format!(
                        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                });
            }
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_stalled_forecast_keeps_current_conditions() {
        let api_url = spawn_stalling_forecast_server().await;
        let provider =
            HttpWeatherProvider::new("key".to_string(), api_url, Duration::from_secs(1)).unwrap();
        let settings = EngineSettings {
            weather_timeout: Duration::from_secs(1),
            forecast_timeout: Duration::from_millis(200),
            ..settings()
        };
        let engine = OutfitRecommender::new(
            Arc::new(inventory_with(wardrobe())),
            Arc::new(provider),
            settings,
        );

        let result = engine
            .generate_weather_based_outfits(
                Uuid::new_v4(),
                WeatherInput::Location(Location::City { city: "Bergen".into() }),
                Some(3),
            )
            .await
            .unwrap();

        assert_eq!(result.weather.temperature, 4.0);
        assert_eq!(result.weather.conditions, "light rain");
        assert!(result.weather.forecast.is_empty());
        assert!(result.recommendation.styles.contains(&"Waterproof".to_string()));
        assert_eq!(result.outfits.len(), 3);
    }

    #[tokio::test]
    async fn test_forecast_error_is_not_fatal() {
        let mut weather = MockWeatherProvider::new();
        weather.expect_current_conditions().returning(|_| {
            Ok(WeatherSnapshot {
                temperature: 12.0,
                conditions: "cloudy".to_string(),
                humidity: 60.0,
                observed_at: None,
                forecast: vec![],
            })
        });
        weather
            .expect_forecast()
            .returning(|_| Err(AppError::WeatherUnavailable("502".into())));
        weather.expect_name().return_const("mock");

        let engine = recommender(inventory_with(wardrobe()), weather, settings());
        let result = engine
            .generate_weather_based_outfits(
                Uuid::new_v4(),
                WeatherInput::Location(Location::City { city: "Leeds".into() }),
                Some(2),
            )
            .await
            .unwrap();

        assert_eq!(result.weather.temperature, 12.0);
        assert_eq!(result.outfits.len(), 2);
    }

    fn event_record(name: &str, garment_type: &str, style: &str, occasions: &[&str]) -> RawGarmentRecord {
        RawGarmentRecord {
            style: Some(style.to_string()),
            occasions: occasions.iter().map(|o| o.to_string()).collect(),
            ..record(name, garment_type, None, &[], 40)
        }
    }

    #[tokio::test]
    async fn test_event_pool_excludes_off_occasion_off_style() {
        let engine = recommender(
            inventory_with(vec![
                event_record("Silk blouse", "Blouse", "Elegant", &["Evening"]),
                event_record("Oxford", "Shirt", "Sport", &["Formal"]),
                event_record("Gym tee", "T-Shirt", "Sport", &["Sport"]),
                event_record("Trousers", "Pants", "Classic", &[]),
            ]),
            unused_weather(),
            settings(),
        );
        let result = engine
            .get_event_suggestions(Uuid::new_v4(), "formal", Some(50))
            .await
            .unwrap();

        let tops: std::collections::HashSet<&str> = result
            .outfits
            .iter()
            .filter_map(|o| o.garment_in(Slot::Top))
            .map(|g| g.name.as_str())
            .collect();
        assert!(!tops.contains("Gym tee"));
        assert_eq!(tops.len(), 2);
        for outfit in &result.outfits {
            assert_eq!(outfit.garment_in(Slot::Bottom).unwrap().name, "Trousers");
        }
    }

    #[tokio::test]
    async fn test_scored_event_ranks_matching_style_first() {
        let settings = EngineSettings {
            ranking_mode: RankingMode::Scored,
            ..settings()
        };
        let engine = recommender(
            inventory_with(vec![
                event_record("Gown", "Blouse", "Elegant", &["Formal"]),
                event_record("Tee", "Shirt", "Sport", &[]),
            ]),
            unused_weather(),
            settings,
        );
        let result = engine
            .get_event_suggestions(Uuid::new_v4(), "Formal", Some(20))
            .await
            .unwrap();

        assert_eq!(result.outfits.len(), 20);
        let has_gown: Vec<bool> = result
            .outfits
            .iter()
            .map(|o| o.garment_in(Slot::Top).map(|g| g.name.as_str()) == Some("Gown"))
            .collect();
        assert!(has_gown.windows(2).all(|w| w[0] >= w[1]));
        assert!(has_gown[0]);
        for outfit in &result.outfits {
            let expected = if outfit.garment_in(Slot::Top).unwrap().name == "Gown" { 0.2 } else { 0.0 };
            assert!((outfit.score.unwrap() - expected).abs() < 1e-9);
        }
    }

    #[tokio::test]
    async fn test_unknown_event_falls_back() {
        let engine = recommender(inventory_with(wardrobe()), unused_weather(), settings());
        let result = engine
            .get_event_suggestions(Uuid::new_v4(), "Hiking", Some(3))
            .await
            .unwrap();

        assert_eq!(result.event, "Hiking");
        assert_eq!(result.recommendation.occasions, vec!["Casual"]);
        assert_eq!(result.recommendation.styles, vec!["Comfortable"]);
        assert_eq!(result.outfits.len(), 3);
    }

    #[tokio::test]
    async fn test_fixed_seed_repeats_draws_not_ids() {
        let engine = recommender(inventory_with(wardrobe()), unused_weather(), settings());
        let first = engine
            .generate_outfits(Uuid::nil(), OutfitFilters::default(), None)
            .await
            .unwrap();
        let second = engine
            .generate_outfits(Uuid::nil(), OutfitFilters::default(), None)
            .await
            .unwrap();

        let picks = |outfits: &[OutfitCandidate]| -> Vec<Vec<String>> {
            outfits
                .iter()
                .map(|o| o.garments.iter().map(|g| g.name.clone()).collect())
                .collect()
        };
        assert_eq!(picks(&first.outfits), picks(&second.outfits));

        let first_ids: Vec<Uuid> = first.outfits.iter().map(|o| o.id).collect();
        for outfit in &second.outfits {
            assert!(!first_ids.contains(&outfit.id));
        }
    }

    #[tokio::test]
    async fn test_parallel_and_scored_modes() {
        let settings = EngineSettings {
            generation_workers: 3,
            ranking_mode: RankingMode::Scored,
            top_k: Some(4),
            ..settings()
        };
        let engine = recommender(inventory_with(wardrobe()), unused_weather(), settings);
        let filters = OutfitFilters {
            colors: vec!["Blue".to_string()],
            ..Default::default()
        };
        let result = engine
            .generate_outfits(Uuid::new_v4(), filters, Some(12))
            .await
            .unwrap();

        assert_eq!(result.outfits.len(), 4);
        let scores: Vec<f64> = result.outfits.iter().map(|o| o.score.unwrap()).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }
}
