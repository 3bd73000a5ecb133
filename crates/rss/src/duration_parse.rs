// ABOUTME: Duration parsing for podcast episode lengths (itunes:duration).
// ABOUTME: Supports integer seconds, HH:MM:SS, MM:SS, and Go-style duration strings.

use std::time::Duration;

/// Parses a duration string.
/// Supports:
/// - Plain integers (seconds)
/// - HH:MM:SS format
/// - MM:SS format
/// - Go-style durations like "1h30m", "45m", "2h"
/// Returns None if parsing fails.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(secs) = s.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }

    if s.contains(':') {
        return parse_colon_format(s);
    }

    ::parse_duration::parse(s).ok()
}

fn parse_colon_format(s: &str) -> Option<Duration> {
    let parts = s
        .split(':')
        .map(|p| p.trim().parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;

    // Overflowing components are rejected like any other malformed duration.
    let secs = match parts.as_slice() {
        [mins, secs] => mins.checked_mul(60)?.checked_add(*secs)?,
        [hours, mins, secs] => hours
            .checked_mul(3600)?
            .checked_add(mins.checked_mul(60)?)?
            .checked_add(*secs)?,
        _ => return None,
    };
    Some(Duration::from_secs(secs))
}
