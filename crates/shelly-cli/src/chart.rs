//! Terminal line chart of power over time.
//!
//! The chart is drawn with ratatui's `Chart` widget into an off-screen
//! [`Buffer`] and then flattened to plain text, so it can be printed to
//! stdout or written to a file like any other command output.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::Line;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Widget};

use shelly_types::LogRecord;
use shelly_types::timestamp::parse_timestamp;

/// Printed instead of a chart when the range is empty.
pub const NO_DATA_MESSAGE: &str = "No data found for the specified range.";

/// One point per record that has both a power value and a parseable
/// timestamp. X is seconds since the first such record.
pub fn power_points(records: &[LogRecord]) -> Vec<(f64, f64)> {
    let mut origin = None;
    records
        .iter()
        .filter_map(|record| {
            let power = record.power?;
            let at = parse_timestamp(&record.timestamp).ok()?;
            let start = *origin.get_or_insert(at);
            let offset = (at - start).num_seconds() as f64;
            Some((offset, power))
        })
        .collect()
}

/// Y bounds with a little headroom. Flat series get a 1 W band so the line
/// is not drawn on the border.
fn y_bounds(points: &[(f64, f64)]) -> [f64; 2] {
    let min = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    if (max - min).abs() < f64::EPSILON {
        return [min - 1.0, max + 1.0];
    }
    let pad = (max - min) * 0.05;
    [min - pad, max + pad]
}

/// Render `records` as a `width` x `height` power chart.
///
/// Returns `None` when there is nothing to draw (no records, or none with a
/// power value).
pub fn render_power_chart(records: &[LogRecord], width: u16, height: u16) -> Option<String> {
    let points = power_points(records);
    if points.is_empty() {
        return None;
    }

    let first = records.iter().find(|r| r.power.is_some())?;
    let last = records.iter().rev().find(|r| r.power.is_some())?;
    let x_min = points.iter().map(|p| p.0).fold(0.0, f64::min);
    let x_max = points.iter().map(|p| p.0).fold(x_min + 1.0, f64::max);
    let [y_min, y_max] = y_bounds(&points);

    let dataset = Dataset::default()
        .name("power (W)")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Yellow))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Power, {} readings ", points.len())),
        )
        .x_axis(
            Axis::default()
                .bounds([x_min, x_max])
                .labels(vec![
                    Line::from(first.timestamp.clone()),
                    Line::from(last.timestamp.clone()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("W")
                .bounds([y_min, y_max])
                .labels(vec![
                    Line::from(format!("{:.0}", y_min)),
                    Line::from(format!("{:.0}", y_max)),
                ]),
        );

    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    chart.render(area, &mut buffer);

    Some(buffer_to_string(&buffer))
}

/// Flatten a buffer to lines of text, trimming trailing blanks.
fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut output = String::new();
    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            line.push_str(buffer[(x, y)].symbol());
        }
        output.push_str(line.trim_end());
        output.push('\n');
    }
    output
}
