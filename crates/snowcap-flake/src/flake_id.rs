use modular_bitfield::prelude::*;
use std::fmt;

pub const SEQUENCE_BITS: u32 = 12;
pub const WORKER_ID_BITS: u32 = 5;
pub const DATA_CENTER_ID_BITS: u32 = 5;
pub const TIMESTAMP_BITS: u32 = 41;

pub const WORKER_ID_SHIFT: u32 = SEQUENCE_BITS;
pub const DATA_CENTER_ID_SHIFT: u32 = SEQUENCE_BITS + WORKER_ID_BITS;
pub const TIMESTAMP_SHIFT: u32 = SEQUENCE_BITS + WORKER_ID_BITS + DATA_CENTER_ID_BITS;

pub const MAX_SEQUENCE: u16 = (1 << SEQUENCE_BITS) - 1;
pub const MAX_WORKER_ID: u8 = (1 << WORKER_ID_BITS) - 1;
pub const MAX_DATA_CENTER_ID: u8 = (1 << DATA_CENTER_ID_BITS) - 1;
pub const MAX_TIMESTAMP_DELTA: u64 = (1 << TIMESTAMP_BITS) - 1;

/// Bit layout of a snowflake identifier, least significant field first.
#[bitfield]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlakeId {
    /// 12 bits for the ordinal within one millisecond.
    pub sequence: B12,
    /// 5 bits for the node within a data center.
    pub worker_id: B5,
    /// 5 bits for the data center.
    pub data_center_id: B5,
    /// 41 bits for milliseconds since a custom epoch.
    pub timestamp: B41,
    #[skip]
    __: B1,
}

impl FlakeId {
    /// Reinterprets a raw identifier. The sign bit is dropped.
    pub fn from_i64(id: i64) -> Self {
        Self::from_bytes(id.to_le_bytes())
    }

    pub fn to_i64(self) -> i64 {
        i64::from_le_bytes(self.into_bytes())
    }
}

impl From<FlakeId> for i64 {
    fn from(id: FlakeId) -> Self {
        id.to_i64()
    }
}

impl fmt::Debug for FlakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlakeId")
            .field("timestamp", &self.timestamp())
            .field("data_center_id", &self.data_center_id())
            .field("worker_id", &self.worker_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}
