mod cli;
mod error;
mod output;
mod pipeline;
mod privacy;
mod readers;
mod schema;
mod types;

use clap::Parser;
use cli::{AnonymizeArgs, Cli, Commands};
use tracing::info;
use tracing_subscriber::prelude::*;
use types::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Anonymize(args) => run_anonymize(&args)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run_anonymize(args: &AnonymizeArgs) -> Result<()> {
    // configuration and load errors both abort before any row is anonymized
    let config = args.to_config()?;
    let delimiter = args.delimiter_byte()?;

    let mut reader = readers::create_reader(&args.input, args.sheet.as_deref(), delimiter)?;
    let table = reader.read()?;
    let records = schema::parse_records(&table)?;
    info!(rows = records.len(), input = %args.input.display(), "input loaded");

    let run = pipeline::anonymize(&records, &config)?;

    output::write_table_file(&run.records, &args.out, delimiter)?;
    info!(output = %args.out.display(), "released table written");

    match &args.metrics {
        Some(path) => {
            output::write_json_file(&run.metrics, path)?;
            info!(metrics = %path.display(), "metrics written");
        }
        None => output::write_json_stdout(&run.metrics)?,
    }

    Ok(())
}
