use crate::storage::{Database, NewRating, NewRestaurant, StorageError};
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

/// Request to add a new restaurant
#[derive(Debug, Deserialize)]
pub struct CreateRestaurantRequest {
    pub restaurant_name: String,
    pub food_type: String,
}

/// Request to add a new rating
#[derive(Debug, Deserialize)]
pub struct CreateRatingRequest {
    pub restaurant_id: i64,
    pub user: i64,
    pub food: i64,
    pub ambient: i64,
    pub staff: i64,
    pub service: i64,
    pub price: i64,

    #[serde(default)]
    pub comment: Option<String>,
}

/// Response after creating a record
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: i64,
    pub message: String,
}

/// Response after deleting a record
#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub id: i64,
    pub message: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub total_restaurants: i64,
    pub total_ratings: i64,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

const SCORE_RANGE: std::ops::RangeInclusive<i64> = 1..=5;

impl CreateRestaurantRequest {
    /// Validate the request
    pub fn validate(&self) -> Result<(), String> {
        if self.restaurant_name.trim().is_empty() {
            return Err("Restaurant name cannot be empty".to_string());
        }
        if self.food_type.trim().is_empty() {
            return Err("Food type cannot be empty".to_string());
        }
        Ok(())
    }

    pub fn into_record(self) -> NewRestaurant {
        NewRestaurant {
            restaurant_name: self.restaurant_name,
            food_type: self.food_type,
        }
    }
}

impl CreateRatingRequest {
    /// Validate the request
    pub fn validate(&self) -> Result<(), String> {
        if self.user <= 0 {
            return Err("User ID must be positive".to_string());
        }

        let scores = [
            ("food", self.food),
            ("ambient", self.ambient),
            ("staff", self.staff),
            ("service", self.service),
            ("price", self.price),
        ];
        for (name, score) in scores {
            if !SCORE_RANGE.contains(&score) {
                return Err(format!(
                    "{} score must be between {} and {}",
                    name,
                    SCORE_RANGE.start(),
                    SCORE_RANGE.end()
                ));
            }
        }
        Ok(())
    }

    pub fn into_record(self) -> NewRating {
        let comment = self
            .comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        NewRating {
            restaurant_id: self.restaurant_id,
            user_id: self.user,
            food: self.food,
            ambient: self.ambient,
            staff: self.staff,
            service: self.service,
            price: self.price,
            comment,
        }
    }
}

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(ErrorResponse {
            error: status.to_string(),
            message,
        }))
        .into_response()
    }
}
