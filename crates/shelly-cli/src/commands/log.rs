//! Log command implementation: one poll, one row.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::util::{connect_meter, open_store};

/// Poll `address` once and append the reading to the database at `db_path`.
///
/// A device that does not answer is reported as an error so cron jobs and
/// scripts see a non-zero exit; the database is left untouched.
pub fn cmd_log(address: &str, index: usize, timeout: Duration, db_path: &Path) -> Result<()> {
    let meter = connect_meter(address, timeout)?;
    let store = open_store(db_path)?;

    match store
        .log_reading(&meter, index)
        .context("Failed to store reading")?
    {
        Some(record) => {
            debug!(
                "Stored reading {} in {}",
                record.id,
                store.path().display()
            );
            Ok(())
        }
        None => bail!(
            "No reading from {} (meter {}); nothing was stored",
            meter.client().base_url(),
            index
        ),
    }
}
