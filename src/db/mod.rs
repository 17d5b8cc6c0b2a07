//! Database module: the car model and its SQLite storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database
//! - `sqlite.rs`: `CarsStorage`, the CRUD operations over the `cars` table

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{DbCar, NewCar};
pub use sqlite::CarsStorage;

use crate::error::CarlotError;

/// Open (creating if needed) the database at `database_url` and apply the schema.
pub async fn spawn(database_url: &str, max_connections: u32) -> Result<CarsStorage, CarlotError> {
    let storage = CarsStorage::connect(database_url, max_connections).await?;
    storage.init_schema().await?;
    Ok(storage)
}
