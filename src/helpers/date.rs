//! Date helper functions

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Parse a post date in the formats posts are written with
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

/// Format a date in the long form of the site language
///
/// # Examples
/// ```ignore
/// long_date("2024-01-15", "ko") // -> "2024년 1월 15일"
/// long_date("2024-01-15", "en") // -> "January 15, 2024"
/// ```
///
/// Unparseable input is returned as written.
pub fn long_date(s: &str, language: &str) -> String {
    let Some(date) = parse_date(s) else {
        return s.to_string();
    };

    match language.split(['-', '_']).next().unwrap_or(language) {
        "ko" => format!("{}년 {}월 {}일", date.year(), date.month(), date.day()),
        "ja" | "zh" => format!("{}年{}月{}日", date.year(), date.month(), date.day()),
        _ => date.format("%B %-d, %Y").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15);
        assert_eq!(parse_date("2024-01-15"), expected);
        assert_eq!(parse_date("2024-01-15 10:30:00"), expected);
        assert_eq!(parse_date("2024-01-15T10:30:00"), expected);
        assert_eq!(parse_date("2024-01-15T10:30:00+09:00"), expected);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_long_date_by_language() {
        assert_eq!(long_date("2024-01-05", "ko"), "2024년 1월 5일");
        assert_eq!(long_date("2024-01-05", "ko-KR"), "2024년 1월 5일");
        assert_eq!(long_date("2024-01-05", "en"), "January 5, 2024");
        assert_eq!(long_date("not a date", "en"), "not a date");
    }
}
