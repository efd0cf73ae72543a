//! Conversion between `<time>` text and [`NaiveDateTime`].
//!
//! Times are second precision and carry no offset. A trailing `Z` and a
//! fractional seconds part are accepted on input and dropped.

use chrono::{NaiveDateTime, Timelike};

const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let (time, rest) = NaiveDateTime::parse_and_remainder(text, FORMAT).ok()?;
    let rest = rest.strip_suffix('Z').unwrap_or(rest);
    let accepted = match rest.strip_prefix('.') {
        Some(fraction) => !fraction.is_empty() && fraction.bytes().all(|b| b.is_ascii_digit()),
        None => rest.is_empty(),
    };
    if !accepted {
        return None;
    }
    time.with_nanosecond(0)
}

pub fn format_timestamp(time: &NaiveDateTime) -> String {
    time.format(FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_parse_plain() {
        assert_eq!(parse_timestamp("2025-01-01T06:04:09"), Some(at(6, 4, 9)));
    }

    #[test]
    fn test_parse_tolerates_zulu_and_fraction() {
        assert_eq!(parse_timestamp("2025-01-01T23:59:59Z"), Some(at(23, 59, 59)));
        assert_eq!(parse_timestamp("2025-01-01T12:00:00.750Z"), Some(at(12, 0, 0)));
        assert_eq!(parse_timestamp("2025-01-01T12:00:00.5"), Some(at(12, 0, 0)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2025-01-01"), None);
        assert_eq!(parse_timestamp("2025-01-01T12:00:00 "), None);
        assert_eq!(parse_timestamp("2025-01-01T12:00:00+09:00"), None);
        assert_eq!(parse_timestamp("2025-01-01T12:00:00."), None);
        assert_eq!(parse_timestamp("2025-13-01T12:00:00"), None);
    }

    #[test]
    fn test_format_is_zero_padded_without_suffix() {
        assert_eq!(format_timestamp(&at(0, 5, 7)), "2025-01-01T00:05:07");
        assert_eq!(format_timestamp(&at(23, 0, 0)), "2025-01-01T23:00:00");
    }

    #[test]
    fn test_format_then_parse() {
        let t = at(13, 37, 42);
        assert_eq!(parse_timestamp(&format_timestamp(&t)), Some(t));
    }
}
