use crate::api::models::*;
use crate::storage::Rating;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

pub async fn list_ratings_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Rating>>, AppError> {
    let ratings = state.db.list_ratings().await?;
    Ok(Json(ratings))
}

pub async fn get_rating_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Rating>, AppError> {
    state
        .db
        .get_rating(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

pub async fn add_rating_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateRatingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let Json(request) = payload?;

    // Validate
    request.validate().map_err(AppError::BadRequest)?;

    let id = state.db.insert_rating(request.into_record()).await?;
    info!(id, "Rating added");

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id,
            message: format!("Added new rating with id: {}", id),
        }),
    ))
}

pub async fn delete_rating_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeletedResponse>, AppError> {
    if !state.db.delete_rating(id).await? {
        return Err(not_found(id));
    }

    info!(id, "Rating deleted");

    Ok(Json(DeletedResponse {
        id,
        message: format!("Deleted rating with id: {}", id),
    }))
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Rating with id {} does not exist.", id))
}
