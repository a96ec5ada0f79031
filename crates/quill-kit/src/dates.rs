// File: src/dates.rs
// Purpose: Date formatting and calendar-day comparisons (UTC)

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC)
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .map(|date| date.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}

/// "January 5, 2024"
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// "January 5, 2024, 03:07 PM"
pub fn format_date_time(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y, %I:%M %p").to_string()
}

fn plural(count: i64, unit: &str) -> String {
    format!("{} {}{} ago", count, unit, if count == 1 { "" } else { "s" })
}

/// Coarse "N units ago" relative to `now`
///
/// Months are 30 days and years 12 months. Anything under a minute, or in
/// the future, is "just now".
pub fn format_relative_time(date: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let seconds = (*now - *date).num_seconds();
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    let months = days / 30;
    let years = months / 12;

    if years > 0 {
        plural(years, "year")
    } else if months > 0 {
        plural(months, "month")
    } else if days > 0 {
        plural(days, "day")
    } else if hours > 0 {
        plural(hours, "hour")
    } else if minutes > 0 {
        plural(minutes, "minute")
    } else {
        "just now".to_string()
    }
}

pub fn is_same_day(a: &DateTime<Utc>, b: &DateTime<Utc>) -> bool {
    a.date_naive() == b.date_naive()
}

pub fn is_today(date: &DateTime<Utc>, now: &DateTime<Utc>) -> bool {
    is_same_day(date, now)
}

pub fn is_yesterday(date: &DateTime<Utc>, now: &DateTime<Utc>) -> bool {
    is_same_day(date, &(*now - Duration::days(1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_format_date() {
        let date = at(2024, 1, 5, 15, 7);
        assert_eq!(format_date(&date), "January 5, 2024");
        assert_eq!(format_date_time(&date), "January 5, 2024, 03:07 PM");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-01-05"), Some(at(2024, 1, 5, 0, 0)));
        assert_eq!(parse_date("2024-01-05T15:07:00Z"), Some(at(2024, 1, 5, 15, 7)));
        assert_eq!(parse_date("2024-01-05T17:07:00+02:00"), Some(at(2024, 1, 5, 15, 7)));
        assert_eq!(parse_date("yesterday"), None);
    }

    #[rstest]
    #[case(at(2024, 6, 1, 12, 0) - Duration::seconds(30), "just now")]
    #[case(at(2024, 6, 1, 11, 59), "1 minute ago")]
    #[case(at(2024, 6, 1, 11, 58), "2 minutes ago")]
    #[case(at(2024, 6, 1, 9, 0), "3 hours ago")]
    #[case(at(2024, 5, 31, 12, 0), "1 day ago")]
    #[case(at(2024, 3, 1, 12, 0), "3 months ago")]
    #[case(at(2021, 6, 1, 12, 0), "3 years ago")]
    #[case(at(2024, 6, 2, 12, 0), "just now")]
    fn test_relative_time(#[case] date: DateTime<Utc>, #[case] expected: &str) {
        let now = at(2024, 6, 1, 12, 0);
        assert_eq!(format_relative_time(&date, &now), expected);
    }

    #[test]
    fn test_day_comparisons() {
        let now = at(2024, 6, 1, 0, 30);
        assert!(is_today(&at(2024, 6, 1, 23, 0), &now));
        assert!(is_yesterday(&at(2024, 5, 31, 1, 0), &now));
        assert!(!is_yesterday(&now, &now));
        assert!(is_same_day(&at(2024, 2, 29, 0, 0), &at(2024, 2, 29, 23, 59)));
        assert!(!is_same_day(&at(2024, 2, 29, 0, 0), &at(2023, 2, 28, 0, 0)));
    }
}
