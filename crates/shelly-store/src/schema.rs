//! Database schema.
//!
//! A single append-only table. There is no version tracking and no migration
//! path: opening an existing file only checks that the expected columns are
//! present.

use rusqlite::Connection;

use crate::error::{Error, Result};

/// Name of the readings table.
pub const READINGS_TABLE: &str = "readings";

/// Columns of the readings table, in storage order.
pub const COLUMNS: [&str; 5] = ["id", "power", "total", "total_returned", "timestamp"];

/// Create the readings table if it does not exist, then verify its columns.
pub fn initialize(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS readings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            power REAL,
            total REAL,
            total_returned REAL,
            timestamp TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_readings_timestamp
            ON readings(timestamp);
        "#,
    )?;

    verify(conn)
}

/// Check that the readings table has every expected column.
fn verify(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let present: Vec<String> = stmt
        .query_map([READINGS_TABLE], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let missing: Vec<String> = COLUMNS
        .iter()
        .filter(|c| !present.iter().any(|p| p == *c))
        .map(|c| c.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::SchemaMismatch { missing })
    }
}
