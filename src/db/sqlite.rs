use crate::db::models::{DbCar, NewCar};
use crate::db::schema::SQLITE_INIT;
use crate::error::CarlotError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

#[derive(Clone)]
pub struct CarsStorage {
    pool: SqlitePool,
}

impl CarsStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url`, creating the database file when it is missing.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, CarlotError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), CarlotError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert a new car. Returns the id assigned by the store.
    pub async fn insert(&self, car: NewCar) -> Result<i64, CarlotError> {
        let res = sqlx::query("INSERT INTO cars (make, model, year, img) VALUES (?, ?, ?, ?)")
            .bind(car.make)
            .bind(car.model)
            .bind(car.year)
            .bind(car.img)
            .execute(&self.pool)
            .await?;
        Ok(res.last_insert_rowid())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<DbCar, CarlotError> {
        sqlx::query_as::<_, DbCar>("SELECT id, make, model, year, img FROM cars WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(CarlotError::NotFound(id))
    }

    /// All cars in insertion order.
    pub async fn list_all(&self) -> Result<Vec<DbCar>, CarlotError> {
        let cars =
            sqlx::query_as::<_, DbCar>("SELECT id, make, model, year, img FROM cars ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(cars)
    }

    /// Overwrite every column except `id`.
    pub async fn update_by_id(&self, id: i64, car: NewCar) -> Result<(), CarlotError> {
        let res = sqlx::query("UPDATE cars SET make = ?, model = ?, year = ?, img = ? WHERE id = ?")
            .bind(car.make)
            .bind(car.model)
            .bind(car.year)
            .bind(car.img)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(CarlotError::NotFound(id));
        }
        Ok(())
    }

    pub async fn delete_by_id(&self, id: i64) -> Result<(), CarlotError> {
        let res = sqlx::query("DELETE FROM cars WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(CarlotError::NotFound(id));
        }
        Ok(())
    }

    pub async fn exists(&self, id: i64) -> Result<bool, CarlotError> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM cars WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    pub async fn count(&self) -> Result<i64, CarlotError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cars")
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }
}
