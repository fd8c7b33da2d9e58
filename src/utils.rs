//! Utility functions for string cleanup, timestamp parsing, and logging.

use chrono::{DateTime, FixedOffset};

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` characters with an ellipsis and
/// byte count indicator appended.
///
/// # Arguments
///
/// * `s` - The string to potentially truncate
/// * `max` - Maximum number of characters to keep
///
/// # Returns
///
/// The original string if shorter than `max`, otherwise a truncated version
/// with `"…(+N bytes)"` appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}…(+{} bytes)", &s[..max], s.len() - max)
    }
}

/// Collapse runs of whitespace into single spaces and trim the ends.
///
/// Sponsor names arrive with irregular spacing once invoice numbers and
/// separators have been stripped out; this normalizes them for matching.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse a feed `updated` timestamp.
///
/// Public-file feeds carry RFC 2822 dates in RSS `pubDate` elements and
/// RFC 3339 dates in Atom `updated` elements; both are accepted. Records
/// keep the raw string, so this is only used for report statistics.
pub fn parse_updated(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
}

/// Format a count with thousands separators (e.g. `12847` -> `"12,847"`).
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  Harris   for  President "), "Harris for President");
        assert_eq!(collapse_whitespace("single"), "single");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn test_parse_updated_rfc2822() {
        let parsed = parse_updated("Wed, 30 Oct 2024 12:34:56 GMT").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-10-30T12:34:56+00:00");
    }

    #[test]
    fn test_parse_updated_rfc3339() {
        let parsed = parse_updated("2024-10-30T12:34:56-04:00").unwrap();
        assert_eq!(parsed.timezone().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn test_parse_updated_garbage() {
        assert!(parse_updated("yesterday-ish").is_none());
        assert!(parse_updated("").is_none());
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(12847), "12,847");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }
}
