//! External collaborators of the recommendation engine
//!
//! The inventory store owns persisted clothing records; the weather provider
//! reports current conditions and, optionally, a short forecast. Both are
//! read-only from the engine's side and swappable behind these traits.
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{split_labels, ForecastPoint, Location, RawGarmentRecord, WeatherSnapshot},
};

pub mod memory;
pub mod postgres;
pub mod weather;

pub use memory::InMemoryInventoryStore;
pub use postgres::PgInventoryStore;
pub use weather::HttpWeatherProvider;

/// Predicates applied by the inventory store before the engine sees any rows
///
/// Every field is optional; label predicates ignore case and price bounds are
/// inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryFilter {
    pub color: Option<String>,
    pub style: Option<String>,
    pub brand: Option<String>,
    pub season: Option<String>,
    pub occasion: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl InventoryFilter {
    pub fn by_brand(brand: impl Into<String>) -> Self {
        Self {
            brand: Some(brand.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Evaluates the filter against a record in memory
    #[instrument(level = "trace", skip_all, fields(garment_id = %record.id))]
    pub fn matches(&self, record: &RawGarmentRecord) -> bool {
        let color_ok = self.color.as_deref().map_or(true, |wanted| {
            record
                .color
                .as_deref()
                .map(split_labels)
                .is_some_and(|colors| colors.iter().any(|c| c.eq_ignore_ascii_case(wanted.trim())))
        });

        color_ok
            && label_matches(self.style.as_deref(), record.style.as_deref())
            && label_matches(self.brand.as_deref(), record.brand.as_deref())
            && member_of(self.season.as_deref(), &record.seasons)
            && member_of(self.occasion.as_deref(), &record.occasions)
            && self.price_in_range(record.price)
    }

    fn price_in_range(&self, price: Option<Decimal>) -> bool {
        if self.min_price.is_none() && self.max_price.is_none() {
            return true;
        }
        let Some(price) = price else {
            return false;
        };
        self.min_price.map_or(true, |min| price >= min)
            && self.max_price.map_or(true, |max| price <= max)
    }
}

fn label_matches(wanted: Option<&str>, actual: Option<&str>) -> bool {
    match (wanted, actual) {
        (None, _) => true,
        (Some(wanted), Some(actual)) => actual.trim().eq_ignore_ascii_case(wanted.trim()),
        (Some(_), None) => false,
    }
}

fn member_of(wanted: Option<&str>, labels: &[String]) -> bool {
    wanted.map_or(true, |wanted| {
        labels
            .iter()
            .any(|label| label.trim().eq_ignore_ascii_case(wanted.trim()))
    })
}

/// Source of a user's clothing inventory
///
/// Any failure to read must surface as `AppError::InventoryUnavailable`.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait InventoryStore: Send + Sync {
    /// Lists a user's garments, pre-filtered by `filter`
    async fn list_garments(
        &self,
        user_id: Uuid,
        filter: &InventoryFilter,
    ) -> AppResult<Vec<RawGarmentRecord>>;

    /// Store name for logging
    fn name(&self) -> &'static str;
}

/// Source of weather conditions
///
/// Failures surface as `AppError::WeatherUnavailable`. Callers bound each
/// call with their own timeout; the forecast is fetched separately so a slow
/// forecast never costs the current conditions.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current_conditions(&self, location: &Location) -> AppResult<WeatherSnapshot>;

    /// Short-range forecast; providers without one return nothing
    async fn forecast(&self, _location: &Location) -> AppResult<Vec<ForecastPoint>> {
        Ok(Vec::new())
    }

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
