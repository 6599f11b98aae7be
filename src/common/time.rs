use chrono::{prelude::Utc, DateTime};

pub fn timestamp_millis() -> i64 {
    let now = Utc::now();

    now.timestamp_millis()
}

// Milliseconds elapsed since an RFC 3339 timestamp, None when it does not parse
pub fn millis_since(timestamp: &str) -> Option<i64> {
    let at = DateTime::parse_from_rfc3339(timestamp).ok()?;

    Some(timestamp_millis() - at.timestamp_millis())
}
