//! Wire date-times and time zone resolution.
//!
//! Start times travel as internet date-times (RFC 3339) with an explicit
//! offset or a `Z` suffix. This crate always writes UTC with `Z` and whole
//! seconds, and accepts any offset on input.

use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use tracing::debug;

/// Formats an instant in the wire format, e.g. `2024-01-15T09:00:00Z`.
pub fn format_date_time(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parses a wire date-time, normalizing it to UTC.
///
/// Returns `None` for anything that is not a valid RFC 3339 date-time,
/// including local date-times without an offset.
pub fn parse_date_time(value: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(value.trim()) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            debug!(value, error = %e, "Unparseable date-time");
            None
        }
    }
}

/// Looks up an IANA time zone identifier.
pub fn lookup_time_zone(id: &str) -> Option<Tz> {
    id.trim().parse::<Tz>().ok()
}

/// Resolves a time zone identifier, falling back to the system zone.
///
/// An absent or unrecognized identifier yields [`local_time_zone`].
pub fn resolve_time_zone(id: Option<&str>) -> Tz {
    match id {
        Some(id) => lookup_time_zone(id).unwrap_or_else(|| {
            debug!(time_zone = id, "Unknown time zone, using the system zone");
            local_time_zone()
        }),
        None => local_time_zone(),
    }
}

/// Returns the system time zone, or UTC when it cannot be determined.
pub fn local_time_zone() -> Tz {
    iana_time_zone::get_timezone()
        .ok()
        .and_then(|id| lookup_time_zone(&id))
        .unwrap_or(Tz::UTC)
}
