//! Human-readable time spans

use chrono::{DateTime, Duration, Utc};

/// Render a span like `1h 2m 3s`; sub-second parts are dropped.
pub fn format_span(span: Duration) -> String {
    let total = span.num_seconds().unsigned_abs();
    let (days, rem) = (total / 86_400, total % 86_400);
    let (hours, rem) = (rem / 3_600, rem % 3_600);
    let (minutes, seconds) = (rem / 60, rem % 60);

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{}d", days));
    }
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 {
        parts.push(format!("{}m", minutes));
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(format!("{}s", seconds));
    }
    parts.join(" ")
}

/// `in 5m 0s` for future instants, `expired 5m ago` for past ones
pub fn format_relative(instant: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let span = instant.signed_duration_since(now);
    if span >= Duration::zero() {
        format!("in {}", format_span(span))
    } else {
        format!("expired {} ago", format_span(span))
    }
}

pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%S UTC").to_string()
}
