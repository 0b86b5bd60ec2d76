use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current conditions as reported by the weather provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherSnapshot {
    /// Degrees Celsius
    pub temperature: f64,
    pub conditions: String,
    /// Percent
    pub humidity: f64,
    #[serde(default)]
    pub observed_at: Option<DateTime<Utc>>,
    /// Short-range forecast, when the provider supplies one
    #[serde(default)]
    pub forecast: Vec<ForecastPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastPoint {
    pub at: DateTime<Utc>,
    pub temperature: f64,
    pub conditions: String,
}

/// Where to ask the weather provider about
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Location {
    Coordinates { lat: f64, lon: f64 },
    City { city: String },
}

/// Derived hints returned alongside weather and event candidates
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub seasons: Vec<String>,
    pub styles: Vec<String>,
    pub occasions: Vec<String>,
}
