use crate::{
    base,
    clock::{Clock, SystemClock},
    error::Error,
    flake_id::{FlakeId, MAX_DATA_CENTER_ID, MAX_SEQUENCE, MAX_TIMESTAMP_DELTA, MAX_WORKER_ID},
    timestamp::decode_timestamp,
};
use jiff::Timestamp;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use typed_builder::TypedBuilder;

/// 2018-11-17T08:50:28.916Z
pub const DEFAULT_EPOCH_MS: i64 = 1_542_444_628_916;
pub const DEFAULT_OUTPUT_BASE: u32 = 16;
pub const DEFAULT_MAX_BACKWARD_WAIT: Duration = Duration::from_secs(5);

/// Upper bound on one wait for the next millisecond; the loop then re-reads
/// the clock so a regression during the wait is caught.
const NEXT_MILLISECOND_SLICE: Duration = Duration::from_millis(2);

fn default_epoch() -> Timestamp {
    Timestamp::from_millisecond(DEFAULT_EPOCH_MS).unwrap_or(Timestamp::UNIX_EPOCH)
}

/// Configures a Snowflake generator instance.
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct SnowflakeSettings {
    /// Node index within the data center, in `[0, 31]`.
    #[builder(default = 1)]
    pub worker_id: i64,
    /// Data center index, in `[0, 31]`.
    #[builder(default = 1)]
    pub data_center_id: i64,
    /// Zero point of the 41-bit millisecond timestamp field.
    #[builder(default = default_epoch())]
    pub epoch: Timestamp,
    /// Base used by [`Snowflake::next_id_string`].
    #[builder(default = DEFAULT_OUTPUT_BASE)]
    pub output_base: u32,
    /// How long `next_id` may block waiting for a clock that moved backwards
    /// before giving up with [`Error::ClockRegression`].
    #[builder(default = DEFAULT_MAX_BACKWARD_WAIT)]
    pub max_backward_wait: Duration,
}

impl Default for SnowflakeSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug, Default)]
struct GeneratorState {
    last_timestamp_ms: Option<i64>,
    sequence: u16,
}

/// Snowflake ID generator.
///
/// Each instance owns its own `(last timestamp, sequence)` state behind a
/// mutex, so two generators with different coordinates never interfere.
pub struct Snowflake<C: Clock = SystemClock> {
    epoch: Timestamp,
    worker_id: u8,
    data_center_id: u8,
    output_base: u32,
    max_backward_wait: Duration,
    clock: C,
    state: Mutex<GeneratorState>,
}

impl Snowflake<SystemClock> {
    /// Creates a generator backed by the real system clock.
    pub fn new(settings: SnowflakeSettings) -> Result<Self, Error> {
        Self::with_clock(settings, SystemClock)
    }
}

impl<C: Clock> Snowflake<C> {
    /// Creates a generator reading time from `clock`.
    pub fn with_clock(settings: SnowflakeSettings, clock: C) -> Result<Self, Error> {
        let worker_id = u8::try_from(settings.worker_id)
            .ok()
            .filter(|id| *id <= MAX_WORKER_ID)
            .ok_or(Error::InvalidWorkerId {
                worker_id: settings.worker_id,
                max_worker_id: MAX_WORKER_ID,
            })?;

        let data_center_id = u8::try_from(settings.data_center_id)
            .ok()
            .filter(|id| *id <= MAX_DATA_CENTER_ID)
            .ok_or(Error::InvalidDataCenterId {
                data_center_id: settings.data_center_id,
                max_data_center_id: MAX_DATA_CENTER_ID,
            })?;

        let output_base = base::validate(settings.output_base)?;

        let now = clock.now();
        if settings.epoch > now {
            return Err(Error::EpochAhead {
                epoch: settings.epoch,
                now,
            });
        }

        info!(
            worker_id,
            data_center_id,
            epoch = %settings.epoch,
            output_base,
            "snowflake generator ready"
        );

        Ok(Self {
            epoch: settings.epoch,
            worker_id,
            data_center_id,
            output_base,
            max_backward_wait: settings.max_backward_wait,
            clock,
            state: Mutex::new(GeneratorState::default()),
        })
    }

    pub fn worker_id(&self) -> u8 {
        self.worker_id
    }

    pub fn data_center_id(&self) -> u8 {
        self.data_center_id
    }

    pub fn epoch(&self) -> Timestamp {
        self.epoch
    }

    pub fn output_base(&self) -> u32 {
        self.output_base
    }

    /// Generates the next identifier as a raw `i64`.
    pub fn next_id(&self) -> Result<i64, Error> {
        self.next_flake_id().map(FlakeId::to_i64)
    }

    /// Generates the next identifier rendered in the configured output base.
    pub fn next_id_string(&self) -> Result<String, Error> {
        base::encode(self.next_id()?, self.output_base)
    }

    /// Recovers the mint time of an identifier produced by this generator.
    pub fn decode_timestamp(&self, id: i64) -> Result<Timestamp, Error> {
        decode_timestamp(id, self.epoch)
    }

    /// Generates the next unique FlakeId.
    ///
    /// - if the per-millisecond sequence is exhausted, wait for the next millisecond
    /// - if the clock moved backward, wait until it catches up, but no longer than
    ///   `max_backward_wait`
    pub fn next_flake_id(&self) -> Result<FlakeId, Error> {
        let mut state = self.state.lock().map_err(|_| Error::StatePoisoned)?;

        let now = self.clock.now().as_millisecond();

        let (now, sequence) = match state.last_timestamp_ms {
            None => (now, 0),
            Some(last) => {
                let now = if now < last {
                    self.wait_out_regression(now, last)?
                } else {
                    now
                };

                if now > last {
                    (now, 0)
                } else if state.sequence < MAX_SEQUENCE {
                    (now, state.sequence + 1)
                } else {
                    debug!(
                        timestamp_ms = last,
                        "sequence exhausted, waiting for next millisecond"
                    );
                    (self.wait_past(last)?, 0)
                }
            }
        };

        let elapsed = now - self.epoch.as_millisecond();
        if elapsed < 0 || elapsed as u64 > MAX_TIMESTAMP_DELTA {
            return Err(Error::OverTimeLimit);
        }

        let id = FlakeId::new()
            .with_timestamp(elapsed as u64)
            .with_data_center_id(self.data_center_id)
            .with_worker_id(self.worker_id)
            .with_sequence(sequence);

        state.last_timestamp_ms = Some(now);
        state.sequence = sequence;

        Ok(id)
    }

    /// Blocks until the clock is back at `last`. Returns the new reading.
    ///
    /// Never blocks longer than `max_backward_wait` in total.
    fn wait_out_regression(&self, now: i64, last: i64) -> Result<i64, Error> {
        let regression = millis(last - now);
        warn!(
            regression_ms = last - now,
            max_wait_ms = self.max_backward_wait.as_millis() as u64,
            "clock moved backwards"
        );
        if regression > self.max_backward_wait {
            return Err(Error::ClockRegression {
                regression,
                max_wait: self.max_backward_wait,
            });
        }

        let started = Instant::now();
        let target = to_timestamp(last)?;
        let mut now = now;
        while now < last {
            let budget = self.max_backward_wait.saturating_sub(started.elapsed());
            if budget.is_zero() {
                return Err(Error::ClockRegression {
                    regression: millis(last - now),
                    max_wait: self.max_backward_wait,
                });
            }
            self.clock.wait_until(target, budget);
            now = self.clock.now().as_millisecond();
        }

        Ok(now)
    }

    /// Blocks until the clock reads strictly later than `last`.
    fn wait_past(&self, last: i64) -> Result<i64, Error> {
        let target = to_timestamp(last + 1)?;
        loop {
            self.clock.wait_until(target, NEXT_MILLISECOND_SLICE);
            let mut now = self.clock.now().as_millisecond();
            if now < last {
                now = self.wait_out_regression(now, last)?;
            }
            if now > last {
                return Ok(now);
            }
        }
    }
}

fn to_timestamp(millisecond: i64) -> Result<Timestamp, Error> {
    Timestamp::from_millisecond(millisecond).map_err(|_| Error::TimestampOutOfRange { millisecond })
}

fn millis(ms: i64) -> Duration {
    Duration::from_millis(ms.unsigned_abs())
}
