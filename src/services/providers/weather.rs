//! OpenWeatherMap-compatible weather provider
//!
//! Current conditions come from `/data/2.5/weather` and the short-range
//! forecast from `/data/2.5/forecast`, as two independent calls. All requests
//! use metric units.
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{ForecastPoint, Location, WeatherSnapshot},
    services::providers::WeatherProvider,
};

/// Forecast points requested (3-hour steps, one day ahead)
const FORECAST_POINTS: u32 = 8;
const UNITS: &str = "metric";

#[derive(Debug, Deserialize)]
struct ApiCurrentWeather {
    main: ApiMain,
    #[serde(default)]
    weather: Vec<ApiCondition>,
    #[serde(default)]
    dt: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ApiMain {
    temp: f64,
    #[serde(default)]
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct ApiCondition {
    main: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ApiForecast {
    #[serde(default)]
    list: Vec<ApiForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct ApiForecastEntry {
    dt: i64,
    main: ApiMain,
    #[serde(default)]
    weather: Vec<ApiCondition>,
}

#[derive(Clone)]
pub struct HttpWeatherProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl HttpWeatherProvider {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build weather client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn location_query(location: &Location) -> Vec<(&'static str, String)> {
        match location {
            Location::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
            Location::City { city } => vec![("q", city.clone())],
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        location: &Location,
        extra: &[(&'static str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);
        let mut query = Self::location_query(location);
        query.push(("units", UNITS.to_string()));
        query.push(("appid", self.api_key.clone()));
        query.extend(extra.iter().cloned());

        let response = self
            .http_client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| AppError::WeatherUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body,
                path = %path,
                "Weather API request failed"
            );
            return Err(AppError::WeatherUnavailable(format!(
                "Weather API returned status {}: {}",
                status, body
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::WeatherUnavailable(format!("Malformed weather payload: {}", e)))
    }

    fn convert_current(current: ApiCurrentWeather) -> WeatherSnapshot {
        WeatherSnapshot {
            temperature: current.main.temp,
            conditions: describe(&current.weather),
            humidity: current.main.humidity,
            observed_at: current.dt.and_then(|dt| DateTime::<Utc>::from_timestamp(dt, 0)),
            forecast: Vec::new(),
        }
    }

    fn convert_forecast(forecast: ApiForecast) -> Vec<ForecastPoint> {
        forecast
            .list
            .into_iter()
            .filter_map(|entry| {
                Some(ForecastPoint {
                    at: DateTime::<Utc>::from_timestamp(entry.dt, 0)?,
                    temperature: entry.main.temp,
                    conditions: describe(&entry.weather),
                })
            })
            .collect()
    }
}

/// Prefers the detailed description ("light rain") over the group name ("Rain")
fn describe(conditions: &[ApiCondition]) -> String {
    conditions
        .first()
        .map(|c| {
            if c.description.trim().is_empty() {
                c.main.clone()
            } else {
                c.description.clone()
            }
        })
        .unwrap_or_default()
}

#[async_trait::async_trait]
impl WeatherProvider for HttpWeatherProvider {
    async fn current_conditions(&self, location: &Location) -> AppResult<WeatherSnapshot> {
        let current: ApiCurrentWeather = self.get_json("/data/2.5/weather", location, &[]).await?;
        let snapshot = Self::convert_current(current);

        tracing::info!(
            temperature = snapshot.temperature,
            conditions = %snapshot.conditions,
            provider = self.name(),
            "Weather fetched"
        );

        Ok(snapshot)
    }

    async fn forecast(&self, location: &Location) -> AppResult<Vec<ForecastPoint>> {
        let forecast: ApiForecast = self
            .get_json(
                "/data/2.5/forecast",
                location,
                &[("cnt", FORECAST_POINTS.to_string())],
            )
            .await?;
        let points = Self::convert_forecast(forecast);

        tracing::debug!(forecast_points = points.len(), provider = self.name(), "Forecast fetched");

        Ok(points)
    }

    fn name(&self) -> &'static str {
        "openweathermap"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_current_prefers_description() {
        let json = r#"{
            "main": {"temp": 7.5, "humidity": 81},
            "weather": [{"main": "Rain", "description": "light rain"}],
            "dt": 1700000000
        }"#;
        let current: ApiCurrentWeather = serde_json::from_str(json).unwrap();
        let snapshot = HttpWeatherProvider::convert_current(current);

        assert_eq!(snapshot.temperature, 7.5);
        assert_eq!(snapshot.humidity, 81.0);
        assert_eq!(snapshot.conditions, "light rain");
        assert_eq!(snapshot.observed_at.unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_convert_current_without_conditions() {
        let json = r#"{"main": {"temp": 21.0}}"#;
        let current: ApiCurrentWeather = serde_json::from_str(json).unwrap();
        let snapshot = HttpWeatherProvider::convert_current(current);

        assert_eq!(snapshot.conditions, "");
        assert!(snapshot.observed_at.is_none());
    }

    #[test]
    fn test_convert_forecast() {
        let json = r#"{"list": [
            {"dt": 1700000000, "main": {"temp": 3.0, "humidity": 90}, "weather": [{"main": "Snow", "description": ""}]},
            {"dt": 1700010800, "main": {"temp": 4.5, "humidity": 85}, "weather": []}
        ]}"#;
        let forecast: ApiForecast = serde_json::from_str(json).unwrap();
        let points = HttpWeatherProvider::convert_forecast(forecast);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].conditions, "Snow");
        assert_eq!(points[1].temperature, 4.5);
    }

    #[test]
    fn test_location_query() {
        let coords = HttpWeatherProvider::location_query(&Location::Coordinates { lat: 1.5, lon: -2.0 });
        assert_eq!(coords, vec![("lat", "1.5".to_string()), ("lon", "-2".to_string())]);

        let city = HttpWeatherProvider::location_query(&Location::City { city: "Oslo".into() });
        assert_eq!(city, vec![("q", "Oslo".to_string())]);
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let provider = HttpWeatherProvider::new(
            "key".to_string(),
            "http://weather.local/".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(provider.api_url, "http://weather.local");
    }
}
