use crate::aggregate::{self, RatingAverages};
use crate::api::models::*;
use crate::storage::Restaurant;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

pub async fn list_restaurants_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Restaurant>>, AppError> {
    let restaurants = state.db.list_restaurants().await?;
    Ok(Json(restaurants))
}

pub async fn get_restaurant_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Restaurant>, AppError> {
    state
        .db
        .get_restaurant(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

pub async fn add_restaurant_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateRestaurantRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let Json(request) = payload?;

    // Validate
    request.validate().map_err(AppError::BadRequest)?;

    info!(name = %request.restaurant_name, food_type = %request.food_type, "Adding restaurant");

    let id = state.db.insert_restaurant(request.into_record()).await?;
    info!(id, "Restaurant added");

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id,
            message: format!("Added new restaurant with id: {}", id),
        }),
    ))
}

pub async fn delete_restaurant_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeletedResponse>, AppError> {
    // Ratings pointing at this restaurant are left in place
    if !state.db.delete_restaurant(id).await? {
        return Err(not_found(id));
    }

    info!(id, "Restaurant deleted");

    Ok(Json(DeletedResponse {
        id,
        message: format!("Deleted restaurant with id: {}", id),
    }))
}

pub async fn food_type_handler(
    State(state): State<AppState>,
    Path(food_type): Path<String>,
) -> Result<Json<Vec<Restaurant>>, AppError> {
    let restaurants = state.db.restaurants_by_food_type(&food_type).await?;

    if restaurants.is_empty() {
        return Err(AppError::NotFound(format!(
            "There are no restaurants with food type {}.",
            food_type
        )));
    }

    info!(food_type = %food_type, found = restaurants.len(), "Filtered restaurants");
    Ok(Json(restaurants))
}

pub async fn averages_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<RatingAverages>>, AppError> {
    let summaries = aggregate::averages_for_all(&state.db)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to compute averages: {}", e)))?;

    Ok(Json(summaries))
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Restaurant with id {} does not exist.", id))
}
