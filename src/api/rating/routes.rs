use crate::api::models::AppState;
use crate::api::rating::handlers::*;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ratings", get(list_ratings_handler))
        .route("/rating", post(add_rating_handler))
        .route("/rating/{id}", get(get_rating_handler))
        .route("/rating_delete/{id}", delete(delete_rating_handler))
}
