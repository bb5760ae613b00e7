//! Raw device document commands (`status`, `settings`).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::format::{FormatOptions, format_json_value};
use crate::util::{connect_client, write_output};

pub fn cmd_status(
    address: &str,
    timeout: Duration,
    output: Option<&PathBuf>,
    opts: &FormatOptions,
) -> Result<()> {
    let client = connect_client(address, timeout)?;
    let status = client
        .status()
        .with_context(|| format!("Failed to fetch status from {}", client.base_url()))?;
    write_output(output, &format_json_value(&status, opts)?)
}

pub fn cmd_settings(
    address: &str,
    timeout: Duration,
    output: Option<&PathBuf>,
    opts: &FormatOptions,
) -> Result<()> {
    let client = connect_client(address, timeout)?;
    let settings = client
        .settings()
        .with_context(|| format!("Failed to fetch settings from {}", client.base_url()))?;
    write_output(output, &format_json_value(&settings, opts)?)
}
