use serde::Serialize;
use sqlx::FromRow;

/// A stored restaurant row
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Restaurant {
    pub id: i64,
    pub restaurant_name: String,
    pub food_type: String,
}

/// A stored rating row.
///
/// `restaurant_id` is not checked against the restaurants table, so a
/// rating may outlive (or predate) the restaurant it points at.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Rating {
    pub id: i64,
    pub restaurant_id: i64,
    pub user_id: i64,
    pub food: i64,
    pub ambient: i64,
    pub staff: i64,
    pub service: i64,
    pub price: i64,
    pub comment: Option<String>,
}

/// Restaurant fields before the store assigns an id
#[derive(Debug, Clone)]
pub struct NewRestaurant {
    pub restaurant_name: String,
    pub food_type: String,
}

/// Rating fields before the store assigns an id
#[derive(Debug, Clone)]
pub struct NewRating {
    pub restaurant_id: i64,
    pub user_id: i64,
    pub food: i64,
    pub ambient: i64,
    pub staff: i64,
    pub service: i64,
    pub price: i64,
    pub comment: Option<String>,
}
