use crate::config::DatabaseConfig;
use crate::storage::records::{NewRating, NewRestaurant, Rating, Restaurant};
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Sqlite;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

const CREATE_RESTAURANTS: &str = "CREATE TABLE IF NOT EXISTS restaurants (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    restaurant_name TEXT NOT NULL,
    food_type TEXT NOT NULL
)";

// No foreign key on restaurant_id: orphan ratings are accepted.
const CREATE_RATINGS: &str = "CREATE TABLE IF NOT EXISTS ratings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    restaurant_id INTEGER NOT NULL,
    user_id INTEGER NOT NULL,
    food INTEGER NOT NULL,
    ambient INTEGER NOT NULL,
    staff INTEGER NOT NULL,
    service INTEGER NOT NULL,
    price INTEGER NOT NULL,
    comment TEXT
)";

const RESTAURANT_COLUMNS: &str = "id, restaurant_name, food_type";
const RATING_COLUMNS: &str =
    "id, restaurant_id, user_id, food, ambient, staff, service, price, comment";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Process-wide handle to the relational store.
///
/// Cloning is cheap; every clone shares the same pool. Each operation
/// checks out one connection and hands it back when the guard drops,
/// whichever way the operation exits.
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the pool described by `config`
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

        // Every connection to an in-memory database sees its own empty
        // database, so those get exactly one long-lived connection.
        let in_memory = config.url.contains(":memory:") || config.url.contains("mode=memory");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };

        let pool = pool_options.connect_with(options).await?;
        info!(url = %config.url, in_memory, "Connected to database");

        Ok(Self { pool })
    }

    /// Create the tables if they do not exist yet
    pub async fn migrate(&self) -> Result<()> {
        let mut conn = self.session().await?;
        sqlx::query(CREATE_RESTAURANTS).execute(&mut *conn).await?;
        sqlx::query(CREATE_RATINGS).execute(&mut *conn).await?;
        info!("Database schema ready");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn session(&self) -> Result<PoolConnection<Sqlite>> {
        Ok(self.pool.acquire().await?)
    }

    // Restaurants

    pub async fn list_restaurants(&self) -> Result<Vec<Restaurant>> {
        let mut conn = self.session().await?;
        let sql = format!("SELECT {RESTAURANT_COLUMNS} FROM restaurants ORDER BY id");
        let restaurants = sqlx::query_as::<_, Restaurant>(&sql)
            .fetch_all(&mut *conn)
            .await?;
        Ok(restaurants)
    }

    pub async fn get_restaurant(&self, id: i64) -> Result<Option<Restaurant>> {
        let mut conn = self.session().await?;
        let sql = format!("SELECT {RESTAURANT_COLUMNS} FROM restaurants WHERE id = ?");
        let restaurant = sqlx::query_as::<_, Restaurant>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(restaurant)
    }

    pub async fn restaurants_by_food_type(&self, food_type: &str) -> Result<Vec<Restaurant>> {
        let mut conn = self.session().await?;
        let sql =
            format!("SELECT {RESTAURANT_COLUMNS} FROM restaurants WHERE food_type = ? ORDER BY id");
        let restaurants = sqlx::query_as::<_, Restaurant>(&sql)
            .bind(food_type)
            .fetch_all(&mut *conn)
            .await?;
        Ok(restaurants)
    }

    /// Insert a restaurant and return its store-assigned id
    pub async fn insert_restaurant(&self, restaurant: NewRestaurant) -> Result<i64> {
        let mut conn = self.session().await?;
        let id = sqlx::query("INSERT INTO restaurants (restaurant_name, food_type) VALUES (?, ?)")
            .bind(restaurant.restaurant_name)
            .bind(restaurant.food_type)
            .execute(&mut *conn)
            .await?
            .last_insert_rowid();
        debug!(id, "Inserted restaurant");
        Ok(id)
    }

    /// Returns `false` when no restaurant had that id
    pub async fn delete_restaurant(&self, id: i64) -> Result<bool> {
        let mut conn = self.session().await?;
        let affected = sqlx::query("DELETE FROM restaurants WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    pub async fn count_restaurants(&self) -> Result<i64> {
        let mut conn = self.session().await?;
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM restaurants")
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }

    // Ratings

    pub async fn list_ratings(&self) -> Result<Vec<Rating>> {
        let mut conn = self.session().await?;
        let sql = format!("SELECT {RATING_COLUMNS} FROM ratings ORDER BY id");
        let ratings = sqlx::query_as::<_, Rating>(&sql)
            .fetch_all(&mut *conn)
            .await?;
        Ok(ratings)
    }

    pub async fn get_rating(&self, id: i64) -> Result<Option<Rating>> {
        let mut conn = self.session().await?;
        let sql = format!("SELECT {RATING_COLUMNS} FROM ratings WHERE id = ?");
        let rating = sqlx::query_as::<_, Rating>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(rating)
    }

    pub async fn ratings_for_restaurant(&self, restaurant_id: i64) -> Result<Vec<Rating>> {
        let mut conn = self.session().await?;
        let sql = format!("SELECT {RATING_COLUMNS} FROM ratings WHERE restaurant_id = ? ORDER BY id");
        let ratings = sqlx::query_as::<_, Rating>(&sql)
            .bind(restaurant_id)
            .fetch_all(&mut *conn)
            .await?;
        Ok(ratings)
    }

    /// Insert a rating and return its store-assigned id
    pub async fn insert_rating(&self, rating: NewRating) -> Result<i64> {
        let mut conn = self.session().await?;
        let id = sqlx::query(
            "INSERT INTO ratings (restaurant_id, user_id, food, ambient, staff, service, price, comment)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(rating.restaurant_id)
        .bind(rating.user_id)
        .bind(rating.food)
        .bind(rating.ambient)
        .bind(rating.staff)
        .bind(rating.service)
        .bind(rating.price)
        .bind(rating.comment)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();
        debug!(id, restaurant_id = rating.restaurant_id, "Inserted rating");
        Ok(id)
    }

    /// Returns `false` when no rating had that id
    pub async fn delete_rating(&self, id: i64) -> Result<bool> {
        let mut conn = self.session().await?;
        let affected = sqlx::query("DELETE FROM ratings WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    pub async fn count_ratings(&self) -> Result<i64> {
        let mut conn = self.session().await?;
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM ratings")
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) async fn memory_db() -> Database {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 5,
        };
        let db = Database::connect(&config).await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    pub(crate) fn new_rating(restaurant_id: i64, scores: [i64; 5]) -> NewRating {
        NewRating {
            restaurant_id,
            user_id: 1,
            food: scores[0],
            ambient: scores[1],
            staff: scores[2],
            service: scores[3],
            price: scores[4],
            comment: None,
        }
    }

    fn pizzeria() -> NewRestaurant {
        NewRestaurant {
            restaurant_name: "Da Mario".to_string(),
            food_type: "italian".to_string(),
        }
    }

    #[tokio::test]
    async fn test_restaurant_round_trip() {
        let db = memory_db().await;

        let id = db.insert_restaurant(pizzeria()).await.unwrap();
        let stored = db.get_restaurant(id).await.unwrap().unwrap();

        assert_eq!(stored.id, id);
        assert_eq!(stored.restaurant_name, "Da Mario");
        assert_eq!(stored.food_type, "italian");
        assert_eq!(db.count_restaurants().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let db = memory_db().await;

        let first = db.insert_restaurant(pizzeria()).await.unwrap();
        let second = db.insert_restaurant(pizzeria()).await.unwrap();

        assert_ne!(first, second);
        let listed: Vec<i64> = db
            .list_restaurants()
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(listed, vec![first, second]);
    }

    #[tokio::test]
    async fn test_delete_missing_returns_false() {
        let db = memory_db().await;

        assert!(!db.delete_restaurant(42).await.unwrap());
        assert!(!db.delete_rating(42).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_existing_restaurant() {
        let db = memory_db().await;
        let id = db.insert_restaurant(pizzeria()).await.unwrap();

        assert!(db.delete_restaurant(id).await.unwrap());
        assert!(db.get_restaurant(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_filter_by_food_type() {
        let db = memory_db().await;
        db.insert_restaurant(pizzeria()).await.unwrap();
        db.insert_restaurant(NewRestaurant {
            restaurant_name: "Golden Dragon".to_string(),
            food_type: "chinese".to_string(),
        })
        .await
        .unwrap();

        let chinese = db.restaurants_by_food_type("chinese").await.unwrap();
        assert_eq!(chinese.len(), 1);
        assert_eq!(chinese[0].restaurant_name, "Golden Dragon");

        assert!(db.restaurants_by_food_type("thai").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ratings_filtered_by_restaurant() {
        let db = memory_db().await;
        let a = db.insert_restaurant(pizzeria()).await.unwrap();

        db.insert_rating(new_rating(a, [4, 5, 3, 4, 2])).await.unwrap();
        db.insert_rating(new_rating(a, [2, 3, 5, 4, 4])).await.unwrap();
        // Orphan rating: no restaurant with this id exists
        let orphan = db.insert_rating(new_rating(999, [1, 1, 1, 1, 1])).await.unwrap();

        assert_eq!(db.ratings_for_restaurant(a).await.unwrap().len(), 2);
        assert_eq!(db.count_ratings().await.unwrap(), 3);

        let stored = db.get_rating(orphan).await.unwrap().unwrap();
        assert_eq!(stored.restaurant_id, 999);
        assert_eq!(stored.comment, None);
    }

    #[tokio::test]
    async fn test_rating_comment_is_kept() {
        let db = memory_db().await;
        let mut rating = new_rating(1, [5, 5, 5, 5, 5]);
        rating.comment = Some("Best risotto in town".to_string());

        let id = db.insert_rating(rating).await.unwrap();
        let stored = db.get_rating(id).await.unwrap().unwrap();

        assert_eq!(stored.comment.as_deref(), Some("Best risotto in town"));
        assert_eq!(db.list_ratings().await.unwrap(), vec![stored]);
    }

    #[tokio::test]
    async fn test_closed_pool_reports_error() {
        let db = memory_db().await;
        db.close().await;

        assert!(matches!(
            db.list_restaurants().await,
            Err(StorageError::Database(_))
        ));
    }
}
