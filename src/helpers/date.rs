//! Date helper functions

use chrono::NaiveDate;

/// Format a date using a Moment.js-compatible format string
///
/// # Examples
/// ```ignore
/// format_date(&date, "MMMM DD, YYYY") // -> "January 15, 2024"
/// ```
pub fn format_date(date: &NaiveDate, format: &str) -> String {
    let chrono_format = moment_to_chrono_format(format);
    date.format(&chrono_format).to_string()
}

/// Format a date in W3C datetime form, as sitemaps expect
pub fn date_xml(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Longest tokens first within each unit
    let replacements = [
        ("YYYY", "%Y"),
        ("YY", "%y"),
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        ("DDDD", "%j"),
        ("DD", "%d"),
        ("dddd", "%A"),
        ("ddd", "%a"),
    ];

    let mut result = format.to_string();

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(&date(), "YYYY-MM-DD"), "2024-01-15");
        assert_eq!(format_date(&date(), "YYYY/MM/DD"), "2024/01/15");
        assert_eq!(format_date(&date(), "MMMM DD, YYYY"), "January 15, 2024");
        assert_eq!(format_date(&date(), "ddd, MMM DD"), "Mon, Jan 15");
    }

    #[test]
    fn test_date_xml() {
        assert_eq!(date_xml(&date()), "2024-01-15");
    }

    #[test]
    fn test_moment_to_chrono() {
        assert_eq!(moment_to_chrono_format("YYYY-MM-DD"), "%Y-%m-%d");
        assert_eq!(moment_to_chrono_format("MMMM DD, YYYY"), "%B %d, %Y");
    }
}
