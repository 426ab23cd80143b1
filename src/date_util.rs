use chrono::NaiveDate;

pub const DAYS_PER_WEEK: f64 = 7.0;

/// Fractional weeks between two dates. Negative spans clamp to zero.
pub fn weeks_between(start: NaiveDate, end: NaiveDate) -> f64 {
    let days = (end - start).num_days();
    if days <= 0 {
        0.0
    } else {
        days as f64 / DAYS_PER_WEEK
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}
