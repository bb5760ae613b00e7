//! Plot command implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::chart::{NO_DATA_MESSAGE, render_power_chart};
use crate::commands::history::build_query;
use crate::util::{open_store, resolve_range, write_output};

/// Arguments for the plot command.
pub struct PlotArgs<'a> {
    pub db_path: &'a Path,
    pub since: Option<String>,
    pub until: Option<String>,
    pub width: u16,
    pub height: u16,
    pub output: Option<&'a PathBuf>,
}

pub fn cmd_plot(args: PlotArgs<'_>) -> Result<()> {
    let PlotArgs {
        db_path,
        since,
        until,
        width,
        height,
        output,
    } = args;

    let (since, until) = resolve_range(since.as_deref(), until.as_deref())?;

    let store = open_store(db_path)?;
    let records = store
        .query(&build_query(since, until, None))
        .context("Failed to query readings")?;

    let content = render_power_chart(&records, width, height)
        .unwrap_or_else(|| format!("{}\n", NO_DATA_MESSAGE));
    write_output(output, &content)
}
