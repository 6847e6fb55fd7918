//! Main entry point for the exomiser CLI.

use clap::{command, Args, Parser, Subcommand};
use exomiser::{annotate, common, data, server};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Variant annotation, filtering, and prioritization"
)]
struct Cli {
    /// Commonly used arguments
    #[command(flatten)]
    common: common::Args,

    /// The sub command to run
    #[command(subcommand)]
    command: Commands,
}

/// Enum supporting the parsing of top-level commands.
#[allow(clippy::large_enum_variant)]
#[derive(Debug, Subcommand)]
enum Commands {
    /// Annotate and filter the variants of a VCF file.
    Annotate(annotate::Args),
    /// Server related commands.
    Server(Server),
    /// Data preparation related commands.
    Data(Data),
}

/// Parsing of "server *" sub commands.
#[derive(Debug, Args)]
#[command(args_conflicts_with_subcommands = true)]
struct Server {
    /// The sub command to run
    #[command(subcommand)]
    command: ServerCommands,
}

/// Enum supporting the parsing of "server *" sub commands.
#[derive(Debug, Subcommand)]
enum ServerCommands {
    Run(server::run::Args),
}

/// Parsing of "data *" sub commands.
#[derive(Debug, Args)]
#[command(args_conflicts_with_subcommands = true)]
struct Data {
    /// The sub command to run
    #[command(subcommand)]
    command: DataCommands,
}

/// Enum supporting the parsing of "data *" sub commands.
#[derive(Debug, Subcommand)]
enum DataCommands {
    Phenotype(data::phenotype::Args),
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Build a tracing subscriber according to the configuration in `cli.common`.
    let collector = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(match cli.common.verbose.log_level() {
            Some(level) => match level {
                log::Level::Error => tracing::Level::ERROR,
                log::Level::Warn => tracing::Level::WARN,
                log::Level::Info => tracing::Level::INFO,
                log::Level::Debug => tracing::Level::DEBUG,
                log::Level::Trace => tracing::Level::TRACE,
            },
            None => tracing::Level::INFO,
        })
        .compact()
        .finish();

    // Install collector and go into sub commands.
    tracing::subscriber::with_default(collector, || {
        tracing::info!("Exomiser startup");

        match &cli.command {
            Commands::Annotate(args) => annotate::run(&cli.common, args)?,
            Commands::Server(server) => match &server.command {
                ServerCommands::Run(args) => server::run::run(&cli.common, args)?,
            },
            Commands::Data(data) => match &data.command {
                DataCommands::Phenotype(args) => data::phenotype::run(&cli.common, args)?,
            },
        }

        tracing::info!("All done. Have a nice day!");

        Ok::<(), anyhow::Error>(())
    })?;

    Ok(())
}
