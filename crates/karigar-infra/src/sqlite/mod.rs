//! SQLite implementations of the karigar-core repository ports.
//!
//! One module per entity, all sharing the split reader/writer pool in
//! [`pool`]. Rows map through private Row structs into domain types; dates
//! are stored as RFC 3339 text.

pub mod booking;
pub mod message;
pub mod pool;
pub mod provider;
pub mod review;
pub mod user;

use chrono::{DateTime, Utc};
use karigar_types::error::RepositoryError;

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}
