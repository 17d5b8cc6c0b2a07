//! SQL DDL for initializing the car table.

/// SQLite schema with:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT, so ids of deleted rows are never reused
/// - `img` nullable, holding a path relative to the media root
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS cars (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    make TEXT NOT NULL,
    model TEXT NOT NULL,
    year INTEGER NOT NULL,
    img TEXT NULL
);
"#;
