// ABOUTME: Date parsing for RSS date fields with ISO-8601 first and RFC-822 as fallback.
// ABOUTME: DateParser is injected into the parser and shared with module builders.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::{Result, RssError};

/// Named zones seen in RSS dates, in seconds east of UTC.
/// chrono's RFC 2822 parser only knows the US zones and GMT/UT.
const NAMED_ZONES: &[(&str, i32)] = &[
    ("GMT", 0),
    ("UTC", 0),
    ("UT", 0),
    ("Z", 0),
    ("EST", -5 * 3600),
    ("EDT", -4 * 3600),
    ("CST", -6 * 3600),
    ("CDT", -5 * 3600),
    ("MST", -7 * 3600),
    ("MDT", -6 * 3600),
    ("PST", -8 * 3600),
    ("PDT", -7 * 3600),
    ("AKST", -9 * 3600),
    ("AKDT", -8 * 3600),
    ("HST", -10 * 3600),
    ("AST", -4 * 3600),
    ("ADT", -3 * 3600),
    ("NST", -(3 * 3600 + 30 * 60)),
    ("NDT", -(2 * 3600 + 30 * 60)),
    ("WET", 0),
    ("WEST", 3600),
    ("CET", 3600),
    ("CEST", 2 * 3600),
    ("EET", 2 * 3600),
    ("EEST", 3 * 3600),
    ("BST", 3600),
    ("MSK", 3 * 3600),
    ("IST", 5 * 3600 + 30 * 60),
    ("JST", 9 * 3600),
    ("KST", 9 * 3600),
    ("AEST", 10 * 3600),
    ("AEDT", 11 * 3600),
    ("AWST", 8 * 3600),
    ("NZST", 12 * 3600),
    ("NZDT", 13 * 3600),
];

/// ISO-8601 shapes beyond strict RFC 3339.
const ISO_WITH_OFFSET: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M:%S%:z",
];

const ISO_NAIVE: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// RFC-822 shapes chrono's strict RFC 2822 parser rejects.
const RFC822_WITH_OFFSET: &[&str] = &[
    "%a, %d %b %Y %H:%M:%S %z",
    "%a, %d %b %Y %H:%M %z",
    "%d %b %Y %H:%M:%S %z",
    "%a, %d %B %Y %H:%M:%S %z",
];

const RFC822_NAIVE: &[&str] = &[
    "%a, %d %b %Y %H:%M:%S",
    "%a, %d %b %Y %H:%M",
    "%d %b %Y %H:%M:%S",
    "%a, %d %B %Y %H:%M:%S",
    "%A, %d %B %Y %H:%M:%S",
];

/// Parses RSS date text into UTC instants.
///
/// Newlines collapse to spaces and runs of spaces to one before any format
/// is tried. ISO-8601 is tried first, then RFC-822, then the caller's own
/// chrono formats.
#[derive(Debug, Clone, Default)]
pub struct DateParser {
    extra_formats: Vec<String>,
    lenient: bool,
}

impl DateParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a chrono format string tried after the built-in ones.
    /// Formats without an offset are read as UTC.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.extra_formats.push(format.into());
        self
    }

    /// When lenient, an unparseable date becomes no value instead of an error.
    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    pub fn is_lenient(&self) -> bool {
        self.lenient
    }

    /// Parses a date, returning None when nothing matches or the text is blank.
    pub fn parse(&self, s: &str) -> Option<DateTime<Utc>> {
        let s = normalize_whitespace(s);
        if s.is_empty() {
            return None;
        }
        parse_iso8601(&s)
            .or_else(|| parse_rfc822(&s))
            .or_else(|| self.parse_extra(&s))
    }

    /// Decodes the text of a date field.
    ///
    /// Blank text is no value. Text that matches no format is a decode error,
    /// or no value with a warning when the parser is lenient.
    pub fn decode(&self, field: &str, s: &str) -> Result<Option<DateTime<Utc>>> {
        if s.trim().is_empty() {
            return Ok(None);
        }
        match self.parse(s) {
            Some(dt) => Ok(Some(dt)),
            None if self.lenient => {
                tracing::warn!(field, value = s, "discarding unparseable date");
                Ok(None)
            }
            None => Err(RssError::decode(field, s, "not an ISO-8601 or RFC-822 date")),
        }
    }

    fn parse_extra(&self, s: &str) -> Option<DateTime<Utc>> {
        self.extra_formats
            .iter()
            .find_map(|fmt| parse_with_offset(s, fmt).or_else(|| parse_naive(s, fmt)))
    }
}

/// Turns newlines and tabs into spaces and collapses runs of spaces.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_iso8601(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ISO_WITH_OFFSET
        .iter()
        .find_map(|fmt| parse_with_offset(s, fmt))
        .or_else(|| ISO_NAIVE.iter().find_map(|fmt| parse_naive(s, fmt)))
        .or_else(|| {
            let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
            Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
        })
}

fn parse_rfc822(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = parse_with_named_zone(s) {
        return Some(dt);
    }
    RFC822_WITH_OFFSET
        .iter()
        .find_map(|fmt| parse_with_offset(s, fmt))
        .or_else(|| RFC822_NAIVE.iter().find_map(|fmt| parse_naive(s, fmt)))
}

/// Handles a trailing zone abbreviation such as `UTC` or `PST`.
fn parse_with_named_zone(s: &str) -> Option<DateTime<Utc>> {
    let (base, zone) = s.rsplit_once(' ')?;
    let offset_secs = NAMED_ZONES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(zone))
        .map(|(_, secs)| *secs)?;
    let offset = FixedOffset::east_opt(offset_secs)?;
    RFC822_NAIVE.iter().find_map(|fmt| {
        let naive = NaiveDateTime::parse_from_str(base, fmt).ok()?;
        let dt = offset.from_local_datetime(&naive).single()?;
        Some(dt.with_timezone(&Utc))
    })
}

fn parse_with_offset(s: &str, fmt: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(s, fmt)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_naive(s: &str, fmt: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, fmt)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}
