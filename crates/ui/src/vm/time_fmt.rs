use chrono::{DateTime, Utc};

#[must_use]
pub fn format_date(value: DateTime<Utc>) -> String {
    value.format("%b %-d, %Y").to_string()
}

#[must_use]
pub fn format_last_activity(value: Option<DateTime<Utc>>) -> String {
    value.map_or_else(|| "No activity date".to_owned(), format_date)
}
