//! History command implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use shelly_store::RangeQuery;

use crate::cli::OutputFormat;
use crate::format::{FormatOptions, format_records_csv, format_records_json, format_records_text};
use crate::util::{open_store, resolve_range, write_output};

/// Arguments for the history command.
pub struct HistoryArgs<'a> {
    pub db_path: &'a Path,
    pub since: Option<String>,
    pub until: Option<String>,
    pub limit: Option<u32>,
    pub format: OutputFormat,
    pub output: Option<&'a PathBuf>,
    pub quiet: bool,
    pub opts: &'a FormatOptions,
}

/// Build the store query for the given bounds.
///
/// With both bounds this is exactly [`Store::data_in_range`]. Without any
/// bound and with a limit, the most recent rows are selected and returned
/// oldest first.
///
/// [`Store::data_in_range`]: shelly_store::Store::data_in_range
pub fn build_query(since: Option<String>, until: Option<String>, limit: Option<u32>) -> RangeQuery {
    let mut query = RangeQuery::new();
    query.since = since;
    query.until = until;
    query.limit = limit;
    query.newest_first = limit.is_some() && query.since.is_none();
    query
}

pub fn cmd_history(args: HistoryArgs<'_>) -> Result<()> {
    let HistoryArgs {
        db_path,
        since,
        until,
        limit,
        format,
        output,
        quiet,
        opts,
    } = args;

    // Parse range bounds upfront to fail fast
    let (since, until) = resolve_range(since.as_deref(), until.as_deref())?;

    let store = open_store(db_path)?;
    let query = build_query(since, until, limit);

    let mut records = store.query(&query).context("Failed to query readings")?;
    if query.newest_first {
        records.reverse();
    }

    if !quiet && format == OutputFormat::Text {
        eprintln!("Found {} readings.", records.len());
    }

    let content = match format {
        OutputFormat::Json => format_records_json(&records, opts)?,
        OutputFormat::Csv => format_records_csv(&records, opts),
        OutputFormat::Text => format_records_text(&records, opts),
    };

    write_output(output, &content)
}
