mod cli;

use crate::cli::{Command, CLI};
use anyhow::Context;
use clap::Parser;
use snowcap_flake::{base, FlakeId};
use snowcap_generator::IdentifierSource;
use std::io::{self, BufWriter, Write};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = CLI::parse();
    let config = cli.generator.to_config();

    info!(
        generator_type = %cli.generator.generator_type,
        output_mode = %cli.generator.output_mode,
        worker_id = config.snowflake.worker_id,
        data_center_id = config.snowflake.data_center_id,
        "starting snowcap"
    );

    let source = IdentifierSource::from_config(&config)
        .context("failed to build identifier source")?;

    match cli.command {
        Command::Next { count } => {
            let mut out = BufWriter::new(io::stdout().lock());
            for _ in 0..count {
                writeln!(out, "{}", source.generate()?)?;
            }
            out.flush()?;
            debug!(count, "identifiers written");
        }
        Command::Decode { id, base: radix } => {
            let radix = radix.unwrap_or(config.snowflake.output_base);
            let value = base::decode(&id, radix)
                .with_context(|| format!("{id:?} is not a base {radix} identifier"))?;
            let minted_at = source.decode_timestamp(value)?;
            let fields = FlakeId::from_i64(value);

            println!("id:             {value}");
            println!("timestamp:      {minted_at}");
            println!("data center id: {}", fields.data_center_id());
            println!("worker id:      {}", fields.worker_id());
            println!("sequence:       {}", fields.sequence());
        }
    }

    Ok(())
}
