use crate::config::{GeneratorType, IdConfig, OutputMode};
use crate::error::GeneratorError;
use crate::random::RandomUuid;
use jiff::Timestamp;
use snowcap_flake::{Clock, Snowflake, SystemClock};
use std::fmt::{Display, Formatter};
use tracing::info;

type Result<T> = std::result::Result<T, GeneratorError>;

/// An identifier in the form selected by [`OutputMode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedId {
    Numeric(i64),
    Text(String),
}

impl Display for GeneratedId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GeneratedId::Numeric(id) => write!(f, "{id}"),
            GeneratedId::Text(id) => f.write_str(id),
        }
    }
}

/// The identifier source chosen at startup.
///
/// The variant is fixed for the lifetime of the value.
pub enum IdentifierSource<C: Clock = SystemClock> {
    Snowflake {
        generator: Snowflake<C>,
        output_mode: OutputMode,
    },
    RandomUuid(RandomUuid),
}

impl IdentifierSource<SystemClock> {
    /// Builds the source described by `config` on the system clock.
    pub fn from_config(config: &IdConfig) -> Result<Self> {
        Self::from_config_with_clock(config, SystemClock)
    }
}

impl<C: Clock> IdentifierSource<C> {
    /// Builds the source described by `config`. The clock is only used by the
    /// snowflake variant.
    pub fn from_config_with_clock(config: &IdConfig, clock: C) -> Result<Self> {
        info!(
            generator_type = %config.generator_type,
            output_mode = %config.output_mode,
            "building identifier source"
        );

        match config.generator_type {
            GeneratorType::Snowflake => {
                let settings = config.snowflake.to_settings()?;
                Ok(Self::Snowflake {
                    generator: Snowflake::with_clock(settings, clock)?,
                    output_mode: config.output_mode,
                })
            }
            GeneratorType::RandomUuid => match config.output_mode {
                OutputMode::String => Ok(Self::RandomUuid(RandomUuid)),
                OutputMode::Numeric => Err(GeneratorError::Unsupported {
                    operation: "numeric output",
                    generator: GeneratorType::RandomUuid,
                }),
            },
        }
    }

    pub fn generator_type(&self) -> GeneratorType {
        match self {
            Self::Snowflake { .. } => GeneratorType::Snowflake,
            Self::RandomUuid(_) => GeneratorType::RandomUuid,
        }
    }

    pub fn output_mode(&self) -> OutputMode {
        match self {
            Self::Snowflake { output_mode, .. } => *output_mode,
            Self::RandomUuid(_) => OutputMode::String,
        }
    }

    /// Numeric identifier. Only the snowflake variant has one.
    pub fn next_id(&self) -> Result<i64> {
        match self {
            Self::Snowflake { generator, .. } => Ok(generator.next_id()?),
            Self::RandomUuid(_) => Err(self.unsupported("next_id")),
        }
    }

    pub fn next_id_string(&self) -> Result<String> {
        match self {
            Self::Snowflake { generator, .. } => Ok(generator.next_id_string()?),
            Self::RandomUuid(random) => Ok(random.next_id_string()),
        }
    }

    /// Generates an identifier through the accessor picked by the output mode.
    pub fn generate(&self) -> Result<GeneratedId> {
        match self.output_mode() {
            OutputMode::Numeric => self.next_id().map(GeneratedId::Numeric),
            OutputMode::String => self.next_id_string().map(GeneratedId::Text),
        }
    }

    /// Recovers the mint time of a snowflake identifier.
    pub fn decode_timestamp(&self, id: i64) -> Result<Timestamp> {
        match self {
            Self::Snowflake { generator, .. } => Ok(generator.decode_timestamp(id)?),
            Self::RandomUuid(_) => Err(self.unsupported("decode_timestamp")),
        }
    }

    /// The underlying snowflake generator, if any.
    pub fn snowflake(&self) -> Option<&Snowflake<C>> {
        match self {
            Self::Snowflake { generator, .. } => Some(generator),
            Self::RandomUuid(_) => None,
        }
    }

    fn unsupported(&self, operation: &'static str) -> GeneratorError {
        GeneratorError::Unsupported {
            operation,
            generator: self.generator_type(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SnowflakeConfig;
    use snowcap_flake::base;
    use std::time::Duration;

    const EPOCH_MS: i64 = 1_555_664_758_384;

    struct FixedClock(Timestamp);

    impl Clock for FixedClock {
        fn now(&self) -> Timestamp {
            self.0
        }

        fn wait_until(&self, _target: Timestamp, _timeout: Duration) {}
    }

    fn fixed_clock(offset_ms: i64) -> FixedClock {
        FixedClock(Timestamp::from_millisecond(EPOCH_MS + offset_ms).unwrap())
    }

    fn snowflake_config(output_mode: OutputMode) -> IdConfig {
        IdConfig::builder()
            .output_mode(output_mode)
            .snowflake(SnowflakeConfig::builder().epoch(EPOCH_MS).build())
            .build()
    }

    fn random_config(output_mode: OutputMode) -> IdConfig {
        IdConfig::builder()
            .generator_type(GeneratorType::RandomUuid)
            .output_mode(output_mode)
            .build()
    }

    #[test]
    fn snowflake_supports_both_accessors() {
        let config = snowflake_config(OutputMode::String);
        let source = IdentifierSource::from_config_with_clock(&config, fixed_clock(1000)).unwrap();
        assert_eq!(source.generator_type(), GeneratorType::Snowflake);

        let first = source.next_id().unwrap();
        assert_eq!(first, (1000 << 22) | (1 << 17) | (1 << 12));

        let second = source.next_id_string().unwrap();
        assert_eq!(base::decode(&second, 16).unwrap(), first + 1);
    }

    #[test]
    fn generate_follows_output_mode() {
        let numeric = IdentifierSource::from_config_with_clock(
            &snowflake_config(OutputMode::Numeric),
            fixed_clock(1000),
        )
        .unwrap();
        assert_eq!(
            numeric.generate().unwrap(),
            GeneratedId::Numeric((1000 << 22) | (1 << 17) | (1 << 12))
        );

        let text = IdentifierSource::from_config_with_clock(
            &snowflake_config(OutputMode::String),
            fixed_clock(1000),
        )
        .unwrap();
        assert_eq!(
            text.generate().unwrap(),
            GeneratedId::Text("FA021000".to_string())
        );
    }

    #[test]
    fn snowflake_decodes_timestamps() {
        let config = snowflake_config(OutputMode::Numeric);
        let source = IdentifierSource::from_config_with_clock(&config, fixed_clock(42)).unwrap();
        let id = source.next_id().unwrap();
        assert_eq!(
            source.decode_timestamp(id).unwrap().as_millisecond(),
            EPOCH_MS + 42
        );
        assert!(source.snowflake().is_some());
    }

    #[test]
    fn snowflake_construction_errors_surface() {
        let config = IdConfig::builder()
            .snowflake(SnowflakeConfig::builder().worker_id(32).epoch(EPOCH_MS).build())
            .build();
        let err = IdentifierSource::from_config_with_clock(&config, fixed_clock(0))
            .err()
            .unwrap();
        assert!(matches!(
            err,
            GeneratorError::Flake(snowcap_flake::Error::InvalidWorkerId { worker_id: 32, .. })
        ));
    }

    #[test]
    fn random_uuid_is_string_only() {
        let source = IdentifierSource::from_config(&random_config(OutputMode::String)).unwrap();
        assert_eq!(source.generator_type(), GeneratorType::RandomUuid);
        assert_eq!(source.next_id_string().unwrap().len(), 36);
        assert!(matches!(source.generate().unwrap(), GeneratedId::Text(_)));
        assert!(source.snowflake().is_none());

        assert_eq!(
            source.next_id(),
            Err(GeneratorError::Unsupported {
                operation: "next_id",
                generator: GeneratorType::RandomUuid,
            })
        );
        assert!(matches!(
            source.decode_timestamp(1 << 22),
            Err(GeneratorError::Unsupported { .. })
        ));
    }

    #[test]
    fn random_uuid_rejects_numeric_mode() {
        let err = IdentifierSource::from_config(&random_config(OutputMode::Numeric))
            .err()
            .unwrap();
        assert_eq!(
            err,
            GeneratorError::Unsupported {
                operation: "numeric output",
                generator: GeneratorType::RandomUuid,
            }
        );
    }

    #[test]
    fn source_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<IdentifierSource>();
    }
}
