use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
///
/// Only collaborator failures abort a recommendation call. Empty wardrobes,
/// unmatched constraints and unknown event labels are normal outcomes.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Inventory unavailable: {0}")]
    InventoryUnavailable(String),

    #[error("Weather unavailable: {0}")]
    WeatherUnavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::InventoryUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::WeatherUnavailable(_) => StatusCode::BAD_GATEWAY,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
