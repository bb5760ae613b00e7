//! Watch command implementation.
//!
//! A plain polling loop: each tick logs one reading to the database and
//! prints it. Polls where the device does not answer are skipped and do not
//! count toward `--count`. With `--max-missed` the loop gives up after that
//! many misses in a row.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::cli::OutputFormat;
use crate::format::{CSV_HEADER, FormatOptions, format_record_csv_line, format_watch_line};
use crate::util::{append_output, connect_meter, open_store};

/// Arguments for the watch command.
pub struct WatchArgs<'a> {
    pub address: &'a str,
    pub index: usize,
    pub timeout: Duration,
    pub db_path: &'a Path,
    pub interval: u64,
    pub count: u32,
    pub max_missed: u32,
    pub format: OutputFormat,
    pub output: Option<&'a PathBuf>,
    pub quiet: bool,
    pub opts: &'a FormatOptions,
}

pub fn cmd_watch(args: WatchArgs<'_>) -> Result<()> {
    let WatchArgs {
        address,
        index,
        timeout,
        db_path,
        interval,
        count,
        max_missed,
        format,
        output,
        quiet,
        opts,
    } = args;

    let meter = connect_meter(address, timeout)?;
    let store = open_store(db_path)?;

    if !quiet {
        eprintln!(
            "Watching {} (meter {}) every {}s, logging to {}",
            meter.client().base_url(),
            index,
            interval,
            store.path().display()
        );
    }

    if format == OutputFormat::Csv && !opts.no_header {
        append_output(output, &format!("{}\n", CSV_HEADER))?;
    }

    let mut stored: u32 = 0;
    let mut missed: u32 = 0;
    let mut missed_in_row: u32 = 0;

    loop {
        match store
            .log_reading(&meter, index)
            .context("Failed to store reading")?
        {
            Some(record) => {
                stored += 1;
                missed_in_row = 0;
                let line = match format {
                    OutputFormat::Text => format_watch_line(&record, opts),
                    OutputFormat::Csv => format_record_csv_line(&record),
                    OutputFormat::Json => opts.with_compact(true).as_json(&record)?,
                };
                append_output(output, &line)?;
            }
            None => {
                missed += 1;
                missed_in_row += 1;
                debug!("Poll skipped ({} missed so far)", missed);
                if max_missed > 0 && missed_in_row >= max_missed {
                    bail!(
                        "Giving up after {} missed polls in a row ({} readings stored)",
                        missed_in_row,
                        stored
                    );
                }
            }
        }

        if count > 0 && stored >= count {
            if !quiet {
                eprintln!("Completed {} readings ({} missed polls).", stored, missed);
            }
            return Ok(());
        }

        thread::sleep(Duration::from_secs(interval));
    }
}
