//! Read command implementation.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use shelly_types::timestamp::now_local;

use crate::cli::OutputFormat;
use crate::format::{
    FormatOptions, LiveReading, format_reading_csv, format_reading_json, format_reading_text,
};
use crate::util::{connect_meter, write_output};

pub fn cmd_read(
    address: &str,
    index: usize,
    timeout: Duration,
    format: OutputFormat,
    output: Option<&PathBuf>,
    opts: &FormatOptions,
) -> Result<()> {
    let meter = connect_meter(address, timeout)?;
    let reading = meter.reading(index).with_context(|| {
        format!(
            "Failed to read meter {} from {}",
            index,
            meter.client().base_url()
        )
    })?;

    let live = LiveReading {
        device: meter.client().base_url(),
        index,
        timestamp: now_local(),
        reading,
    };

    let content = match format {
        OutputFormat::Json => format_reading_json(&live, opts)?,
        OutputFormat::Csv => format_reading_csv(&live, opts),
        OutputFormat::Text => format_reading_text(&live, opts),
    };

    write_output(output, &content)
}
