//! Output formatting utilities for text, JSON, and CSV output.

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;

use shelly_types::{LogRecord, MeterReading};

/// Header row shared by every CSV output.
pub const CSV_HEADER: &str = "id,timestamp,power_w,total_wh,total_returned_wh";

/// Printed by `history` when a range matches nothing.
pub const NO_RECORDS_MESSAGE: &str = "No readings found for the specified range.";

/// Formatting options for output.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
    /// Omit header row in CSV output.
    pub no_header: bool,
    /// Use compact JSON output (no pretty-printing).
    pub compact: bool,
}

impl FormatOptions {
    pub fn new(no_color: bool) -> Self {
        Self {
            no_color,
            ..Self::default()
        }
    }

    /// Create with no_header option for CSV output.
    pub fn with_no_header(mut self, no_header: bool) -> Self {
        self.no_header = no_header;
        self
    }

    /// Create with compact JSON option.
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Serialize value to JSON string, respecting compact option.
    pub fn as_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let json = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        Ok(json + "\n")
    }

    /// Power in watts, colored by direction: drawing is yellow, feeding
    /// back is green.
    pub fn format_power(&self, power: Option<f64>) -> String {
        let Some(watts) = power else {
            return "-".to_string();
        };
        let text = format!("{:.2} W", watts);
        if self.no_color {
            text
        } else if watts < 0.0 {
            format!("{}", text.green())
        } else {
            format!("{}", text.yellow())
        }
    }

    /// Energy in watt-hours, `-` when missing.
    pub fn format_energy(&self, energy: Option<f64>) -> String {
        energy
            .map(|wh| format!("{:.2} Wh", wh))
            .unwrap_or_else(|| "-".to_string())
    }

    fn label(&self, text: &str) -> String {
        if self.no_color {
            text.to_string()
        } else {
            format!("{}", text.bold())
        }
    }
}

/// Escape a value for CSV output.
#[must_use]
pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn csv_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Raw device JSON, pretty-printed unless compact.
pub fn format_json_value(value: &Value, opts: &FormatOptions) -> Result<String> {
    opts.as_json(value)
}

// ============================================================================
// Single reading
// ============================================================================

/// A reading fresh from the device, before it is stored.
#[derive(Debug, Clone, Serialize)]
pub struct LiveReading<'a> {
    pub device: &'a str,
    pub index: usize,
    pub timestamp: String,
    #[serde(flatten)]
    pub reading: MeterReading,
}

#[must_use]
pub fn format_reading_text(live: &LiveReading<'_>, opts: &FormatOptions) -> String {
    let reading = &live.reading;
    let mut output = format!(
        "{} {} (meter {}) at {}\n",
        opts.label("Shelly EM"),
        live.device,
        live.index,
        live.timestamp
    );
    output.push_str(&format!(
        "  Power:     {}\n",
        opts.format_power(reading.power)
    ));
    output.push_str(&format!(
        "  Consumed:  {}\n",
        opts.format_energy(reading.total)
    ));
    output.push_str(&format!(
        "  Returned:  {}\n",
        opts.format_energy(reading.total_returned)
    ));
    if let Some(net) = reading.net_energy_wh() {
        output.push_str(&format!("  Net:       {:.2} Wh\n", net));
    }
    output
}

#[must_use]
pub fn format_reading_csv(live: &LiveReading<'_>, opts: &FormatOptions) -> String {
    let mut output = if opts.no_header {
        String::new()
    } else {
        "device,index,timestamp,power_w,total_wh,total_returned_wh\n".to_string()
    };
    output.push_str(&format!(
        "{},{},{},{},{},{}\n",
        csv_escape(live.device),
        live.index,
        live.timestamp,
        csv_number(live.reading.power),
        csv_number(live.reading.total),
        csv_number(live.reading.total_returned),
    ));
    output
}

pub fn format_reading_json(live: &LiveReading<'_>, opts: &FormatOptions) -> Result<String> {
    opts.as_json(live)
}

// ============================================================================
// Stored records
// ============================================================================

#[must_use]
pub fn format_records_text(records: &[LogRecord], opts: &FormatOptions) -> String {
    if records.is_empty() {
        return format!("{}\n", NO_RECORDS_MESSAGE);
    }

    let mut output = format!("Readings ({} records):\n\n", records.len());

    let mut builder = Builder::default();
    builder.push_record(["ID", "Timestamp", "Power", "Consumed", "Returned"]);
    for record in records {
        builder.push_record([
            record.id.to_string(),
            record.timestamp.clone(),
            opts.format_power(record.power),
            opts.format_energy(record.total),
            opts.format_energy(record.total_returned),
        ]);
    }

    let mut table = builder.build();
    if opts.no_color {
        table.with(Style::ascii());
    } else {
        table.with(Style::rounded());
    }
    output.push_str(&table.to_string());
    output.push('\n');

    if let Some(summary) = summarize(records) {
        output.push_str(&summary);
    }

    output
}

/// Min / max / mean power over records that have a power value.
fn summarize(records: &[LogRecord]) -> Option<String> {
    let powers: Vec<f64> = records.iter().filter_map(|r| r.power).collect();
    if powers.is_empty() {
        return None;
    }
    let min = powers.iter().copied().fold(f64::INFINITY, f64::min);
    let max = powers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = powers.iter().sum::<f64>() / powers.len() as f64;
    Some(format!(
        "Power min {:.2} W, max {:.2} W, mean {:.2} W\n",
        min, max, mean
    ))
}

#[must_use]
pub fn format_records_csv(records: &[LogRecord], opts: &FormatOptions) -> String {
    let mut output = if opts.no_header {
        String::new()
    } else {
        format!("{}\n", CSV_HEADER)
    };
    for record in records {
        output.push_str(&format_record_csv_line(record));
    }
    output
}

pub fn format_records_json(records: &[LogRecord], opts: &FormatOptions) -> Result<String> {
    opts.as_json(records)
}

// ============================================================================
// Watch formatting
// ============================================================================

#[must_use]
pub fn format_watch_line(record: &LogRecord, opts: &FormatOptions) -> String {
    format!(
        "[{}] {}  consumed {}  returned {}\n",
        record.timestamp,
        opts.format_power(record.power),
        opts.format_energy(record.total),
        opts.format_energy(record.total_returned)
    )
}

#[must_use]
pub fn format_record_csv_line(record: &LogRecord) -> String {
    format!(
        "{},{},{},{},{}\n",
        record.id,
        record.timestamp,
        csv_number(record.power),
        csv_number(record.total),
        csv_number(record.total_returned)
    )
}
