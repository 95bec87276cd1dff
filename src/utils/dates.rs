use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::utils::errors::ServiceError;

/// Parses a client-supplied timestamp.
///
/// Accepts full RFC 3339 (`2024-01-31T09:30:00Z`), a bare date (`2024-01-31`,
/// midnight UTC) or a date-time without offset (`2024-01-31T09:30:00`, UTC).
pub fn parse_date_time(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|dt| dt.and_utc())
}

/// Empty or missing strings are treated as "no date".
pub fn parse_optional(value: Option<&str>, field: &str) -> Result<Option<DateTime<Utc>>, ServiceError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_date_time(raw).map(Some).ok_or_else(|| {
            ServiceError::ValidationError(format!(
                "Invalid {} format. Use YYYY-MM-DD or ISO 8601 format",
                field
            ))
        }),
    }
}
