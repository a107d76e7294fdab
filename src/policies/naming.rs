use chrono::{DateTime, Utc};

/// `strftime` layout of the suffix appended to colliding policy names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// `{base}-{YYYYMMDD-HHMMSS}` for the given instant.
#[must_use]
pub fn timestamped_name(base: &str, at: DateTime<Utc>) -> String {
    format!("{base}-{}", at.format(TIMESTAMP_FORMAT))
}
