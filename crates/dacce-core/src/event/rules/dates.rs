//! Event timestamp conversion.

use chrono::{DateTime, NaiveDateTime};
use tracing::debug;

use crate::models::record::LocalDateTime;

/// Convert an ISO-8601 timestamp into the local date and time of the
/// issuer.
///
/// Fiscal timestamps carry the issuing timezone as their offset
/// (`2024-01-15T10:30:00-03:00`), so the wall-clock time in that offset is
/// what gets printed. Timestamps without an offset are taken as already
/// local. Anything unparsable yields an empty pair.
pub fn to_local_date_time(value: &str) -> LocalDateTime {
    let value = value.trim();
    if value.is_empty() {
        return LocalDateTime::default();
    }

    let naive = DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f"));

    match naive {
        Ok(naive) => LocalDateTime {
            date: naive.format("%d/%m/%Y").to_string(),
            time: naive.format("%H:%M:%S").to_string(),
        },
        Err(e) => {
            debug!("Unparsable timestamp {:?}: {}", value, e);
            LocalDateTime::default()
        }
    }
}
