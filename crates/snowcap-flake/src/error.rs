use jiff::Timestamp;
use std::time::Duration;
use thiserror::Error;

/// Errors returned by snowflake construction, ID generation and the base codec.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid worker id {worker_id}; expected 0..={max_worker_id}")]
    InvalidWorkerId { worker_id: i64, max_worker_id: u8 },
    #[error("invalid data center id {data_center_id}; expected 0..={max_data_center_id}")]
    InvalidDataCenterId {
        data_center_id: i64,
        max_data_center_id: u8,
    },
    #[error("invalid base {base}; expected 2..=36")]
    InvalidBase { base: u32 },
    #[error("negative value {0} cannot be encoded")]
    NegativeValue(i64),
    #[error("no digits to decode")]
    EmptyDigits,
    #[error("invalid digit {digit:?} for base {base}")]
    InvalidDigit { digit: char, base: u32 },
    #[error("value {text:?} does not fit in 63 bits")]
    ValueOverflow { text: String },
    #[error("epoch is ahead of current clock time: epoch={epoch}, now={now}")]
    EpochAhead { epoch: Timestamp, now: Timestamp },
    #[error("clock moved backwards by {regression:?}; refusing to wait longer than {max_wait:?}")]
    ClockRegression {
        regression: Duration,
        max_wait: Duration,
    },
    #[error("overtime limit")]
    OverTimeLimit,
    #[error("timestamp {millisecond}ms is out of range")]
    TimestampOutOfRange { millisecond: i64 },
    #[error("generator state lock is poisoned")]
    StatePoisoned,
}

impl Error {
    /// Whether this error comes from a bad argument rather than from the clock or
    /// the generator state.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Error::InvalidWorkerId { .. }
                | Error::InvalidDataCenterId { .. }
                | Error::InvalidBase { .. }
                | Error::NegativeValue(_)
                | Error::EmptyDigits
                | Error::InvalidDigit { .. }
                | Error::ValueOverflow { .. }
        )
    }
}
