//! UUIDv7 utilities for time-ordered identifiers.
//!
//! Note and revision ids are UUIDv7, which embed a millisecond-precision
//! timestamp in the first 48 bits. Revisions inserted later therefore sort
//! after earlier ones, which backs the "stable chronological order"
//! guarantee of the revision store alongside the `created_at` column.

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

/// Generate a new UUIDv7 identifier.
#[inline]
pub fn new_v7() -> Uuid {
    Uuid::now_v7()
}

/// Check if a UUID is version 7.
#[inline]
pub fn is_v7(uuid: &Uuid) -> bool {
    uuid.get_version_num() == 7
}

/// Extract the embedded timestamp from a UUIDv7.
///
/// Returns `None` if the UUID is not version 7.
pub fn extract_timestamp(uuid: &Uuid) -> Option<DateTime<Utc>> {
    let bytes = uuid.as_bytes();
    if (bytes[6] >> 4) != 7 {
        return None;
    }

    let millis = ((bytes[0] as u64) << 40)
        | ((bytes[1] as u64) << 32)
        | ((bytes[2] as u64) << 24)
        | ((bytes[3] as u64) << 16)
        | ((bytes[4] as u64) << 8)
        | (bytes[5] as u64);

    Utc.timestamp_millis_opt(millis as i64).single()
}
