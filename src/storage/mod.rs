pub mod records;
pub mod sqlite;

pub use records::{NewRating, NewRestaurant, Rating, Restaurant};
pub use sqlite::{Database, StorageError};
