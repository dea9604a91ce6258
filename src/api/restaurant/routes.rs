use crate::api::models::AppState;
use crate::api::restaurant::handlers::*;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/restaurants", get(list_restaurants_handler))
        .route("/restaurants/averages", get(averages_handler))
        .route("/restaurant", post(add_restaurant_handler))
        .route("/restaurant/{id}", get(get_restaurant_handler))
        .route("/restaurant_delete/{id}", delete(delete_restaurant_handler))
        .route("/food_type/{food_type}", get(food_type_handler))
}
