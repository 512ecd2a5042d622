//! Text rendering for the bandwidth dashboard.
//!
//! Turns a [`DashboardView`] into a status line and a character chart:
//! one row per axis tick (highest first), one column per sample, `r` for
//! receive, `t` for transmit and `*` where both land on the same row.

use bwmon_core::{ConnectionStatus, DashboardView, PollMode, Sample};
use chrono::{Local, TimeZone};

/// Format an axis label. Labels always carry three decimals, whatever the
/// tick precision, so small rates stay readable.
pub fn format_tick(value: f64) -> String {
    format!("{value:.3}")
}

/// Format an epoch-millisecond timestamp as local `HH:MM:SS`.
pub fn format_clock(timestamp: i64) -> String {
    Local
        .timestamp_millis_opt(timestamp)
        .single()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// `Status: Connected | Last reading: 12:00:05 | Target: 10.0.0.1/ether1`
pub fn status_line(view: &DashboardView) -> String {
    let status = match view.status {
        ConnectionStatus::Connected    => "Connected",
        ConnectionStatus::Disconnected => "Disconnected",
    };
    let last = view
        .last_reading
        .map(format_clock)
        .unwrap_or_else(|| "N/A".to_string());

    let mut line = format!("Status: {status} | Last reading: {last} | Target: {}", view.target);
    if view.mode == PollMode::Paused {
        line.push_str(" | Paused");
    }
    line
}

/// Index of the tick closest to `value`.
fn nearest_tick(value: f64, ticks: &[f64]) -> usize {
    ticks
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (*a - value).abs().total_cmp(&(*b - value).abs()))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn cell(sample: &Sample, row: usize, ticks: &[f64]) -> char {
    let rx = nearest_tick(sample.rx_mbps, ticks) == row;
    let tx = nearest_tick(sample.tx_mbps, ticks) == row;
    match (rx, tx) {
        (true, true)   => '*',
        (true, false)  => 'r',
        (false, true)  => 't',
        (false, false) => ' ',
    }
}

/// Chart rows, top to bottom, followed by the x-axis and its time labels.
pub fn chart(view: &DashboardView) -> Vec<String> {
    let ticks = &view.axis.ticks;
    let labels: Vec<String> = ticks.iter().map(|t| format_tick(*t)).collect();
    let width = labels.iter().map(String::len).max().unwrap_or(0);
    let columns = view.samples.len();

    let mut lines: Vec<String> = (0..ticks.len())
        .rev()
        .map(|row| {
            let cells: String = view.samples.iter().map(|s| cell(s, row, ticks)).collect();
            format!("{:>width$} |{cells}", labels[row])
        })
        .collect();

    lines.push(format!("{:>width$} +{}", "Mbps", "-".repeat(columns)));

    if let (Some(first), Some(last)) = (view.samples.first(), view.samples.last()) {
        let start = format_clock(first.timestamp);
        let end = format_clock(last.timestamp);
        let pad = columns.saturating_sub(start.len() + end.len());
        let axis = if columns > 1 && pad > 0 {
            format!("{start}{}{end}", " ".repeat(pad))
        } else {
            start
        };
        lines.push(format!("{:>width$}  {axis}", ""));
    }

    lines
}

/// Full frame: status line, blank line, chart.
pub fn render(view: &DashboardView) -> String {
    let mut out = status_line(view);
    out.push_str("\n\n");
    out.push_str(&chart(view).join("\n"));
    out.push('\n');
    out
}
