//! Per-restaurant rating averages.
//!
//! Scores are summed as integers over the whole rating set and divided
//! once at the end, so a summary never depends on the order ratings were
//! read in. A restaurant without ratings summarizes to all zeros.

use crate::storage::{Database, Rating, Restaurant, StorageError};
use serde::Serialize;
use tracing::info;

/// Mean of every rating dimension for one restaurant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingAverages {
    pub restaurant_id: i64,
    pub restaurant_name: String,
    pub food: f64,
    pub ambient: f64,
    pub staff: f64,
    pub service: f64,
    pub price: f64,
    /// Mean of the five dimension means
    pub average: f64,
}

#[derive(Default)]
struct DimensionTotals {
    food: i64,
    ambient: i64,
    staff: i64,
    service: i64,
    price: i64,
}

impl DimensionTotals {
    fn add(&mut self, rating: &Rating) {
        self.food += rating.food;
        self.ambient += rating.ambient;
        self.staff += rating.staff;
        self.service += rating.service;
        self.price += rating.price;
    }
}

/// Summarize the ratings that belong to `restaurant`
pub fn summarize(restaurant: &Restaurant, ratings: &[Rating]) -> RatingAverages {
    let count = ratings.len();

    let (food, ambient, staff, service, price) = if count == 0 {
        (0.0, 0.0, 0.0, 0.0, 0.0)
    } else {
        let totals = ratings.iter().fold(DimensionTotals::default(), |mut acc, r| {
            acc.add(r);
            acc
        });
        let n = count as f64;
        (
            totals.food as f64 / n,
            totals.ambient as f64 / n,
            totals.staff as f64 / n,
            totals.service as f64 / n,
            totals.price as f64 / n,
        )
    };

    RatingAverages {
        restaurant_id: restaurant.id,
        restaurant_name: restaurant.restaurant_name.clone(),
        food,
        ambient,
        staff,
        service,
        price,
        average: (food + ambient + staff + service + price) / 5.0,
    }
}

/// Summaries for every restaurant, in the order storage lists them.
///
/// Restaurants and each restaurant's ratings are separate reads, so a
/// concurrent write may show up in some summaries and not others. Any
/// storage failure aborts the whole computation.
pub async fn averages_for_all(db: &Database) -> Result<Vec<RatingAverages>, StorageError> {
    let restaurants = db.list_restaurants().await?;
    let mut summaries = Vec::with_capacity(restaurants.len());

    for restaurant in &restaurants {
        let ratings = db.ratings_for_restaurant(restaurant.id).await?;
        summaries.push(summarize(restaurant, &ratings));
    }

    info!(restaurants = summaries.len(), "Computed rating averages");
    Ok(summaries)
}
