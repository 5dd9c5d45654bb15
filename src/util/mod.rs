//! Display formatting and time-bound parsing helpers.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Formats an epoch-seconds value for table cells (UTC).
pub fn fmt_ts_secs(ts: i64) -> String {
    match Utc.timestamp_opt(ts, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}

/// Formats an optional timestamp; missing values display as "-".
pub fn fmt_opt_ts(ts: &Option<DateTime<Utc>>) -> String {
    match ts {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}

/// Optional string for display; missing values display as "-".
pub fn display_opt(value: &Option<String>) -> String {
    match value {
        Some(s) if !s.is_empty() => s.clone(),
        _ => "-".to_string(),
    }
}

/// Truncates to `max` characters with an ellipsis.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Error type for time parsing failures.
#[derive(Debug, Clone)]
pub struct TimeParseError {
    pub input: String,
    pub message: String,
}

impl std::fmt::Display for TimeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to parse time '{}': {}", self.input, self.message)
    }
}

impl std::error::Error for TimeParseError {}

/// Parses one bound of the log time-range filter into a UTC timestamp.
///
/// Supported formats:
/// - ISO 8601 datetime: `2026-08-01T17:00:00` or `2026-08-01T17:00`
/// - Date only (midnight UTC): `2026-08-01`
/// - Unix timestamp: `1754064000`
/// - Relative to now: `-1h`, `-30m`, `-2d`, `-1w`, `-60s`
pub fn parse_time_bound(input: &str) -> Result<DateTime<Utc>, TimeParseError> {
    let input = input.trim();

    if let Some(ts) = try_parse_unix_timestamp(input)
        .or_else(|| try_parse_relative(input))
        .or_else(|| try_parse_iso8601(input))
        .or_else(|| try_parse_date_only(input))
    {
        return Utc.timestamp_opt(ts, 0).single().ok_or(TimeParseError {
            input: input.to_string(),
            message: "timestamp out of range".to_string(),
        });
    }

    Err(TimeParseError {
        input: input.to_string(),
        message: "use ISO 8601 (2026-08-01T17:00), a date (2026-08-01), \
                  a Unix timestamp, or relative (-1h, -30m, -2d)"
            .to_string(),
    })
}

/// Parses a `FROM..TO` range where either side may be empty
/// (unbounded). A bare expression with no `..` is a lower bound.
#[allow(clippy::type_complexity)]
pub fn parse_time_range(
    input: &str,
) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>), TimeParseError> {
    let input = input.trim();
    let (from_str, to_str) = match input.split_once("..") {
        Some((from, to)) => (from.trim(), to.trim()),
        None => (input, ""),
    };

    let from = if from_str.is_empty() {
        None
    } else {
        Some(parse_time_bound(from_str)?)
    };
    let to = if to_str.is_empty() {
        None
    } else {
        Some(parse_time_bound(to_str)?)
    };
    Ok((from, to))
}

/// Plain integer, seconds since epoch.
fn try_parse_unix_timestamp(input: &str) -> Option<i64> {
    if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) {
        input.parse::<i64>().ok()
    } else {
        None
    }
}

/// Relative time (-1h, -30m, -2d, -1w, -60s), anchored to now.
fn try_parse_relative(input: &str) -> Option<i64> {
    let rest = input.strip_prefix('-')?;
    let unit = rest.chars().last()?;
    let number_str = &rest[..rest.len() - 1];
    if number_str.is_empty() {
        return None;
    }
    let number: i64 = number_str.parse().ok()?;

    let seconds = match unit {
        's' => number,
        'm' => number * 60,
        'h' => number * 3600,
        'd' => number * 86400,
        'w' => number * 604800,
        _ => return None,
    };
    Some(Utc::now().timestamp() - seconds)
}

/// ISO 8601 datetime with a `T` separator, optional timezone/seconds.
fn try_parse_iso8601(input: &str) -> Option<i64> {
    if !input.contains('T') {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc).timestamp());
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&ndt).timestamp());
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M") {
        return Some(Utc.from_utc_datetime(&ndt).timestamp());
    }
    None
}

/// Bare date, midnight UTC.
fn try_parse_date_only(input: &str) -> Option<i64> {
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()?;
    let ndt = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&ndt).timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative() {
        let now = Utc::now().timestamp();

        let ts = parse_time_bound("-1h").unwrap().timestamp();
        assert!((ts - (now - 3600)).abs() < 2);

        let ts = parse_time_bound("-2d").unwrap().timestamp();
        assert!((ts - (now - 172800)).abs() < 2);

        let ts = parse_time_bound("-60s").unwrap().timestamp();
        assert!((ts - (now - 60)).abs() < 2);
    }

    #[test]
    fn test_iso8601() {
        let expected = Utc
            .with_ymd_and_hms(2026, 8, 1, 17, 0, 0)
            .single()
            .unwrap();
        assert_eq!(parse_time_bound("2026-08-01T17:00:00").unwrap(), expected);
        assert_eq!(parse_time_bound("2026-08-01T17:00").unwrap(), expected);
    }

    #[test]
    fn test_date_only_is_midnight_utc() {
        let expected = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).single().unwrap();
        assert_eq!(parse_time_bound("2026-08-01").unwrap(), expected);
    }

    #[test]
    fn test_invalid_formats() {
        assert!(parse_time_bound("").is_err());
        assert!(parse_time_bound("invalid").is_err());
        assert!(parse_time_bound("-abc").is_err());
        assert!(parse_time_bound("12:34:56:78").is_err());
    }

    #[test]
    fn test_range_both_sides() {
        let (from, to) = parse_time_range("2026-08-01..2026-08-02").unwrap();
        assert_eq!(
            from.unwrap(),
            Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).single().unwrap()
        );
        assert_eq!(
            to.unwrap(),
            Utc.with_ymd_and_hms(2026, 8, 2, 0, 0, 0).single().unwrap()
        );
    }

    #[test]
    fn test_range_open_ends() {
        let (from, to) = parse_time_range("..2026-08-02").unwrap();
        assert!(from.is_none());
        assert!(to.is_some());

        let (from, to) = parse_time_range("-1h..").unwrap();
        assert!(from.is_some());
        assert!(to.is_none());

        // Bare expression is a lower bound.
        let (from, to) = parse_time_range("-1h").unwrap();
        assert!(from.is_some());
        assert!(to.is_none());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer string", 8), "a longe…");
    }

    #[test]
    fn test_display_opt() {
        assert_eq!(display_opt(&Some("x".to_string())), "x");
        assert_eq!(display_opt(&Some(String::new())), "-");
        assert_eq!(display_opt(&None), "-");
    }
}
