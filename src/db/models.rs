use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct DbCar {
    pub id: i64,
    pub make: String,
    pub model: String,
    pub year: i64,
    /// Path of the uploaded image, relative to the media root.
    pub img: Option<String>,
}

/// Column values for an insert or a full update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCar {
    pub make: String,
    pub model: String,
    pub year: i64,
    pub img: Option<String>,
}

