//! Formatting helpers shared by the view components

use std::time::Duration;

pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}", minutes, seconds)
}

/// Elapsed and total time, with `--:--` while the length is unknown
pub fn format_elapsed(elapsed: Duration, length: Option<Duration>) -> String {
    let total = length.map(format_duration).unwrap_or_else(|| "--:--".to_string());
    format!("{} / {}", format_duration(elapsed), total)
}
