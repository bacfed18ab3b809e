use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use snowcap_flake::{
    Error, SnowflakeSettings, DEFAULT_EPOCH_MS, DEFAULT_MAX_BACKWARD_WAIT, DEFAULT_OUTPUT_BASE,
};
use std::fmt::{Display, Formatter};
use std::time::Duration;
use typed_builder::TypedBuilder;

pub const DEFAULT_MAX_BACKWARD_WAIT_MS: u64 = DEFAULT_MAX_BACKWARD_WAIT.as_millis() as u64;

/// Which kind of identifier source to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeneratorType {
    #[default]
    Snowflake,
    RandomUuid,
}

impl Display for GeneratorType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GeneratorType::Snowflake => write!(f, "snowflake"),
            GeneratorType::RandomUuid => write!(f, "random-uuid"),
        }
    }
}

/// Which accessor [`IdentifierSource::generate`](crate::IdentifierSource::generate)
/// goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    #[default]
    String,
    Numeric,
}

impl Display for OutputMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputMode::String => write!(f, "string"),
            OutputMode::Numeric => write!(f, "numeric"),
        }
    }
}

/// Snowflake options as they appear in configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "kebab-case", default)]
pub struct SnowflakeConfig {
    #[builder(default = 1)]
    pub worker_id: i64,
    #[builder(default = 1)]
    pub data_center_id: i64,
    /// Milliseconds since the Unix epoch.
    #[builder(default = DEFAULT_EPOCH_MS)]
    pub epoch: i64,
    #[builder(default = DEFAULT_OUTPUT_BASE)]
    pub output_base: u32,
    #[builder(default = DEFAULT_MAX_BACKWARD_WAIT_MS)]
    pub max_backward_wait_ms: u64,
}

impl Default for SnowflakeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl SnowflakeConfig {
    pub fn to_settings(&self) -> Result<SnowflakeSettings, Error> {
        let epoch = Timestamp::from_millisecond(self.epoch)
            .map_err(|_| Error::TimestampOutOfRange {
                millisecond: self.epoch,
            })?;

        Ok(SnowflakeSettings::builder()
            .worker_id(self.worker_id)
            .data_center_id(self.data_center_id)
            .epoch(epoch)
            .output_base(self.output_base)
            .max_backward_wait(Duration::from_millis(self.max_backward_wait_ms))
            .build())
    }
}

/// Top-level identifier configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "kebab-case", default)]
pub struct IdConfig {
    #[builder(default)]
    pub generator_type: GeneratorType,
    #[builder(default)]
    pub output_mode: OutputMode,
    #[builder(default)]
    pub snowflake: SnowflakeConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: IdConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, IdConfig::default());
        assert_eq!(config.generator_type, GeneratorType::Snowflake);
        assert_eq!(config.output_mode, OutputMode::String);
        assert_eq!(config.snowflake.worker_id, 1);
        assert_eq!(config.snowflake.data_center_id, 1);
        assert_eq!(config.snowflake.epoch, DEFAULT_EPOCH_MS);
        assert_eq!(config.snowflake.output_base, 16);
        assert_eq!(config.snowflake.max_backward_wait_ms, 5_000);
    }

    #[test]
    fn reads_kebab_case_keys() {
        let config: IdConfig = serde_json::from_str(
            r#"{
                "generator-type": "random-uuid",
                "output-mode": "numeric",
                "snowflake": { "worker-id": 7, "data-center-id": 3, "output-base": 36 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.generator_type, GeneratorType::RandomUuid);
        assert_eq!(config.output_mode, OutputMode::Numeric);
        assert_eq!(config.snowflake.worker_id, 7);
        assert_eq!(config.snowflake.data_center_id, 3);
        assert_eq!(config.snowflake.output_base, 36);
        assert_eq!(config.snowflake.epoch, DEFAULT_EPOCH_MS);
    }

    #[test]
    fn rejects_unknown_generator_types() {
        let result = serde_json::from_str::<IdConfig>(r#"{ "generator-type": "ulid" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn default_backward_wait_matches_the_generator() {
        let settings = SnowflakeConfig::default().to_settings().unwrap();
        assert_eq!(settings.max_backward_wait, DEFAULT_MAX_BACKWARD_WAIT);
        assert_eq!(
            settings.max_backward_wait,
            SnowflakeSettings::builder().build().max_backward_wait
        );
    }

    #[test]
    fn converts_to_settings() {
        let config = SnowflakeConfig::builder()
            .worker_id(4)
            .epoch(1_555_664_758_384)
            .max_backward_wait_ms(250)
            .build();
        let settings = config.to_settings().unwrap();
        assert_eq!(settings.worker_id, 4);
        assert_eq!(settings.data_center_id, 1);
        assert_eq!(settings.epoch.as_millisecond(), 1_555_664_758_384);
        assert_eq!(settings.max_backward_wait, Duration::from_millis(250));
    }

    #[test]
    fn display_matches_serde_names() {
        assert_eq!(GeneratorType::RandomUuid.to_string(), "random-uuid");
        assert_eq!(OutputMode::Numeric.to_string(), "numeric");
        assert_eq!(
            serde_json::to_string(&GeneratorType::RandomUuid).unwrap(),
            "\"random-uuid\""
        );
    }
}
