//! Snowflake-style 64-bit identifiers.
//!
//! Every identifier packs a 41-bit millisecond delta from a custom epoch, a
//! 5-bit data-center id, a 5-bit worker id and a 12-bit per-millisecond
//! sequence. The sign bit is always zero.

pub mod base;
mod clock;
pub mod error;
mod flake_id;
mod snowflake;
mod timestamp;

pub use clock::{Clock, SystemClock};
pub use error::Error;
pub use flake_id::{
    FlakeId, DATA_CENTER_ID_SHIFT, MAX_DATA_CENTER_ID, MAX_SEQUENCE, MAX_TIMESTAMP_DELTA,
    MAX_WORKER_ID, TIMESTAMP_SHIFT, WORKER_ID_SHIFT,
};
pub use snowflake::{
    Snowflake, SnowflakeSettings, DEFAULT_EPOCH_MS, DEFAULT_MAX_BACKWARD_WAIT, DEFAULT_OUTPUT_BASE,
};
pub use timestamp::decode_timestamp;
