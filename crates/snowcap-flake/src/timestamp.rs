use crate::{error::Error, flake_id::TIMESTAMP_SHIFT};
use jiff::Timestamp;

/// Recovers the time at which `id` was minted.
///
/// `epoch` must be the epoch of the generator that produced `id`; a different
/// epoch silently yields a different time.
pub fn decode_timestamp(id: i64, epoch: Timestamp) -> Result<Timestamp, Error> {
    if id < 0 {
        return Err(Error::NegativeValue(id));
    }

    let delta = id >> TIMESTAMP_SHIFT;
    let millisecond = delta
        .checked_add(epoch.as_millisecond())
        .ok_or(Error::TimestampOutOfRange {
            millisecond: i64::MAX,
        })?;

    Timestamp::from_millisecond(millisecond)
        .map_err(|_| Error::TimestampOutOfRange { millisecond })
}
