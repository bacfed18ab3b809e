use clap::{Args, Parser, Subcommand, ValueEnum};
use snowcap_flake::{DEFAULT_EPOCH_MS, DEFAULT_OUTPUT_BASE};
use snowcap_generator::config::DEFAULT_MAX_BACKWARD_WAIT_MS;
use snowcap_generator::{GeneratorType, IdConfig, OutputMode, SnowflakeConfig};
use std::fmt::{Display, Formatter};

pub const GENERATOR_TYPE_ENV: &str = "SNOWCAP_GENERATOR_TYPE";
pub const OUTPUT_MODE_ENV: &str = "SNOWCAP_OUTPUT_MODE";
pub const WORKER_ID_ENV: &str = "SNOWCAP_WORKER_ID";
pub const DATA_CENTER_ID_ENV: &str = "SNOWCAP_DATA_CENTER_ID";
pub const EPOCH_ENV: &str = "SNOWCAP_EPOCH";
pub const OUTPUT_BASE_ENV: &str = "SNOWCAP_OUTPUT_BASE";
pub const MAX_BACKWARD_WAIT_ENV: &str = "SNOWCAP_MAX_BACKWARD_WAIT_MS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GeneratorTypeArg {
    #[value(name = "snowflake")]
    Snowflake,
    #[value(name = "random-uuid")]
    RandomUuid,
}

impl Display for GeneratorTypeArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GeneratorTypeArg::Snowflake => write!(f, "snowflake"),
            GeneratorTypeArg::RandomUuid => write!(f, "random-uuid"),
        }
    }
}

impl From<GeneratorTypeArg> for GeneratorType {
    fn from(value: GeneratorTypeArg) -> Self {
        match value {
            GeneratorTypeArg::Snowflake => GeneratorType::Snowflake,
            GeneratorTypeArg::RandomUuid => GeneratorType::RandomUuid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputModeArg {
    #[value(name = "string")]
    String,
    #[value(name = "numeric")]
    Numeric,
}

impl Display for OutputModeArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputModeArg::String => write!(f, "string"),
            OutputModeArg::Numeric => write!(f, "numeric"),
        }
    }
}

impl From<OutputModeArg> for OutputMode {
    fn from(value: OutputModeArg) -> Self {
        match value {
            OutputModeArg::String => OutputMode::String,
            OutputModeArg::Numeric => OutputMode::Numeric,
        }
    }
}

/// Options shared by every command.
#[derive(Debug, Args)]
pub struct GeneratorArgs {
    #[arg(
        long,
        env = GENERATOR_TYPE_ENV,
        value_enum,
        default_value_t = GeneratorTypeArg::Snowflake,
        global = true
    )]
    pub generator_type: GeneratorTypeArg,

    #[arg(
        long,
        env = OUTPUT_MODE_ENV,
        value_enum,
        default_value_t = OutputModeArg::String,
        global = true
    )]
    pub output_mode: OutputModeArg,

    #[arg(
        long,
        env = WORKER_ID_ENV,
        default_value_t = 1,
        allow_negative_numbers = true,
        global = true
    )]
    pub worker_id: i64,

    #[arg(
        long,
        env = DATA_CENTER_ID_ENV,
        default_value_t = 1,
        allow_negative_numbers = true,
        global = true
    )]
    pub data_center_id: i64,

    /// Generator epoch in milliseconds since the Unix epoch.
    #[arg(long, env = EPOCH_ENV, default_value_t = DEFAULT_EPOCH_MS, global = true)]
    pub epoch: i64,

    #[arg(long, env = OUTPUT_BASE_ENV, default_value_t = DEFAULT_OUTPUT_BASE, global = true)]
    pub output_base: u32,

    #[arg(
        long,
        env = MAX_BACKWARD_WAIT_ENV,
        default_value_t = DEFAULT_MAX_BACKWARD_WAIT_MS,
        global = true
    )]
    pub max_backward_wait_ms: u64,
}

impl GeneratorArgs {
    pub fn to_config(&self) -> IdConfig {
        IdConfig::builder()
            .generator_type(self.generator_type.into())
            .output_mode(self.output_mode.into())
            .snowflake(
                SnowflakeConfig::builder()
                    .worker_id(self.worker_id)
                    .data_center_id(self.data_center_id)
                    .epoch(self.epoch)
                    .output_base(self.output_base)
                    .max_backward_wait_ms(self.max_backward_wait_ms)
                    .build(),
            )
            .build()
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print new identifiers, one per line.
    Next {
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
    /// Break a snowflake identifier into its fields.
    Decode {
        id: String,
        /// Base the identifier is written in. Defaults to the output base.
        #[arg(long)]
        base: Option<u32>,
    },
}

#[derive(Debug, Parser)]
#[command(name = "snowcap", about = "Snowflake identifier generator")]
pub struct CLI {
    #[command(flatten)]
    pub generator: GeneratorArgs,

    #[command(subcommand)]
    pub command: Command,
}
