//! Identifier sources selected once from configuration.
//!
//! A source is either backed by a [`Snowflake`](snowcap_flake::Snowflake)
//! generator (numeric, ordered, decodable) or by random v4 UUIDs (string only).

pub mod config;
pub mod error;
mod random;
mod source;

pub use config::{GeneratorType, IdConfig, OutputMode, SnowflakeConfig};
pub use error::GeneratorError;
pub use random::RandomUuid;
pub use source::{GeneratedId, IdentifierSource};
