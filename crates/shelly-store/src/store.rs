//! Main store implementation.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension, Row};
use tracing::{debug, info, warn};

use shelly_core::{MeterSource, reading_from_value};
use shelly_types::timestamp::{now_local, validate_timestamp};
use shelly_types::{LogRecord, MeterReading};

use crate::error::{Error, Result};
use crate::queries::RangeQuery;
use crate::schema;

const SELECT_RECORD: &str = "SELECT id, power, total, total_returned, timestamp FROM readings";

/// SQLite-backed append-only log of meter readings.
///
/// The store owns the database path, not a connection: every operation opens
/// its own connection and closes it before returning.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Open or create a database at the given path.
    ///
    /// Creates parent directories and the `readings` table when missing.
    /// Safe to call repeatedly on the same file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;
        schema::initialize(&conn)?;

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_db_path())
    }

    /// Path of the backing database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.path)?)
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<LogRecord> {
    Ok(LogRecord {
        id: row.get(0)?,
        power: row.get(1)?,
        total: row.get(2)?,
        total_returned: row.get(3)?,
        timestamp: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
    })
}

// Write operations
impl Store {
    /// Append a reading stamped with the current local time.
    pub fn insert_reading(&self, reading: &MeterReading) -> Result<LogRecord> {
        self.insert_row(reading, now_local())
    }

    /// Append a reading with an explicit `YYYY-MM-DD HH:MM:SS` timestamp.
    pub fn insert_reading_at(&self, reading: &MeterReading, timestamp: &str) -> Result<LogRecord> {
        validate_timestamp(timestamp)?;
        self.insert_row(reading, timestamp.to_string())
    }

    fn insert_row(&self, reading: &MeterReading, timestamp: String) -> Result<LogRecord> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO readings (power, total, total_returned, timestamp)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                reading.power,
                reading.total,
                reading.total_returned,
                timestamp
            ],
        )?;

        let record = LogRecord {
            id: conn.last_insert_rowid(),
            power: reading.power,
            total: reading.total,
            total_returned: reading.total_returned,
            timestamp,
        };
        debug!("Inserted reading {} at {}", record.id, record.timestamp);
        Ok(record)
    }

    /// Poll `meter` once and append the result.
    ///
    /// If the device cannot produce meter info for `index` (unreachable,
    /// bad response, index past the end) nothing is written, the failure is
    /// logged, and `Ok(None)` is returned. No gap marker is stored. Storage
    /// failures are returned as errors.
    pub fn log_reading<M: MeterSource + ?Sized>(
        &self,
        meter: &M,
        index: usize,
    ) -> Result<Option<LogRecord>> {
        let info = match meter.meter_info(index) {
            Ok(info) => info,
            Err(e) => {
                warn!(
                    "No reading logged from {} (meter {}): {}",
                    meter.source_name(),
                    index,
                    e
                );
                return Ok(None);
            }
        };

        let reading = reading_from_value(&info);
        let record = self.insert_reading(&reading)?;
        info!(
            "Logged reading {} from {} (meter {}): {}",
            record.id,
            meter.source_name(),
            index,
            reading
        );
        Ok(Some(record))
    }
}

// Read operations
impl Store {
    /// Rows with `start <= timestamp <= end`, in insertion order.
    ///
    /// Both bounds must be full `YYYY-MM-DD HH:MM:SS` timestamps. The
    /// comparison is on strings, which matches chronological order only for
    /// that fixed-width format. An empty `Vec` means nothing matched.
    pub fn data_in_range(&self, start: &str, end: &str) -> Result<Vec<LogRecord>> {
        validate_timestamp(start)?;
        validate_timestamp(end)?;

        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE timestamp BETWEEN ?1 AND ?2 ORDER BY id ASC",
            SELECT_RECORD
        ))?;
        let records = stmt
            .query_map([start, end], record_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(
            "Range {} .. {} matched {} readings",
            start,
            end,
            records.len()
        );
        Ok(records)
    }

    /// Run a [`RangeQuery`].
    pub fn query(&self, query: &RangeQuery) -> Result<Vec<LogRecord>> {
        if let Some(ref since) = query.since {
            validate_timestamp(since)?;
        }
        if let Some(ref until) = query.until {
            validate_timestamp(until)?;
        }

        let sql = query.build_sql();
        let (_, params) = query.build_where();

        debug!("Executing query: {}", sql);

        let conn = self.connect()?;
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(rusqlite::params_from_iter(params), record_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// The most recently inserted row.
    pub fn latest_reading(&self) -> Result<Option<LogRecord>> {
        let conn = self.connect()?;
        let record = conn
            .query_row(
                &format!("{} ORDER BY id DESC LIMIT 1", SELECT_RECORD),
                [],
                record_from_row,
            )
            .optional()?;
        Ok(record)
    }

    /// Total number of rows.
    pub fn count_readings(&self) -> Result<u64> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM readings", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
