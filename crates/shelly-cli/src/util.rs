//! Utility functions for CLI operations.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use shelly_core::{DeviceClient, EnergyMeter};
use shelly_store::Store;
use shelly_types::timestamp::{range_end, range_start};

/// Get device address, with helpful error message.
pub fn require_device(device: Option<String>) -> Result<String> {
    device.ok_or_else(|| {
        anyhow::anyhow!(
            "No device specified. Use --device <ADDRESS>, set the SHELLY_DEVICE environment variable,\n\
             or save a default with 'shelly config set device <ADDRESS>'."
        )
    })
}

/// Build a device client, reporting bad addresses clearly.
pub fn connect_client(address: &str, timeout: Duration) -> Result<DeviceClient> {
    DeviceClient::with_timeout(address, timeout)
        .with_context(|| format!("Cannot use device address '{}'", address))
}

/// Build an energy meter client.
pub fn connect_meter(address: &str, timeout: Duration) -> Result<EnergyMeter> {
    Ok(EnergyMeter::from_client(connect_client(address, timeout)?))
}

/// Open the reading database.
pub fn open_store(path: &Path) -> Result<Store> {
    Store::open(path).with_context(|| format!("Failed to open database {}", path.display()))
}

/// Turn `--since` / `--until` into full inclusive bounds.
pub fn resolve_range(
    since: Option<&str>,
    until: Option<&str>,
) -> Result<(Option<String>, Option<String>)> {
    let since = since
        .map(range_start)
        .transpose()
        .context("Invalid --since")?;
    let until = until
        .map(range_end)
        .transpose()
        .context("Invalid --until")?;
    Ok((since, until))
}

/// Write output to file or stdout
pub fn write_output(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }
        None => {
            print!("{}", content);
            io::stdout().flush()?;
        }
    }
    Ok(())
}

/// Append output to a file, or print to stdout.
pub fn append_output(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            let mut file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            file.write_all(content.as_bytes())
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }
        None => {
            print!("{}", content);
            io::stdout().flush()?;
        }
    }
    Ok(())
}
