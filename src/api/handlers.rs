use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::AppState;
use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{Location, OutfitFilters, WeatherSnapshot},
    services::{
        recommendations::{EventOutfits, GeneratedOutfits, WeatherOutfits},
        WeatherInput,
    },
};

/// Largest count accepted over HTTP
pub const MAX_COUNT: usize = 100;

// Request types

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GenerateOutfitsRequest {
    pub filters: OutfitFilters,
    pub count: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WeatherOutfitsRequest {
    pub weather: Option<WeatherSnapshot>,
    pub location: Option<Location>,
    pub count: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CountQuery {
    pub count: Option<usize>,
}

fn validate_count(count: Option<usize>) -> AppResult<Option<usize>> {
    match count {
        Some(n) if n == 0 || n > MAX_COUNT => Err(AppError::InvalidInput(format!(
            "count must be between 1 and {}",
            MAX_COUNT
        ))),
        other => Ok(other),
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Generic outfit generation from explicit filters
pub async fn generate_outfits(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<GenerateOutfitsRequest>,
) -> AppResult<Json<GeneratedOutfits>> {
    let count = validate_count(request.count)?;
    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        count = ?count,
        "Processing outfit generation request"
    );

    let result = state
        .recommender
        .generate_outfits(user_id, request.filters, count)
        .await?;

    Ok(Json(result))
}

/// Weather-driven generation; either a snapshot or a location must be supplied
pub async fn generate_weather_outfits(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<WeatherOutfitsRequest>,
) -> AppResult<Json<WeatherOutfits>> {
    let count = validate_count(request.count)?;
    let input = match (request.weather, request.location) {
        (Some(snapshot), _) => WeatherInput::Snapshot(snapshot),
        (None, Some(location)) => WeatherInput::Location(location),
        (None, None) => {
            return Err(AppError::InvalidInput(
                "Provide either weather or location".to_string(),
            ))
        }
    };

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        from_provider = matches!(input, WeatherInput::Location(_)),
        "Processing weather outfit request"
    );

    let result = state
        .recommender
        .generate_weather_based_outfits(user_id, input, count)
        .await?;

    Ok(Json(result))
}

/// Event-driven suggestions
pub async fn event_outfits(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path((user_id, event)): Path<(Uuid, String)>,
    Query(query): Query<CountQuery>,
) -> AppResult<Json<EventOutfits>> {
    let count = validate_count(query.count)?;
    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        event = %event,
        "Processing event outfit request"
    );

    let result = state
        .recommender
        .get_event_suggestions(user_id, &event, count)
        .await?;

    Ok(Json(result))
}
