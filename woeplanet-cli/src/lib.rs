//! Command-line interface for inspecting a WOE ID gazetteer cache.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};

mod commands;
mod error;

pub use error::CliError;

use commands::{AncestorArgs, InitArgs, MaxwoeidArgs, PlaceArgs};

const ARG_CACHE: &str = "cache";
const ARG_WOEID: &str = "woeid";
const ARG_PLACETYPE: &str = "placetype";
const ENV_INIT_CACHE: &str = "WOEPLANET_CMDS_INIT_CACHE";
const ENV_PLACE_CACHE: &str = "WOEPLANET_CMDS_PLACE_CACHE";
const ENV_PLACE_WOEID: &str = "WOEPLANET_CMDS_PLACE_WOEID";
const ENV_ANCESTOR_CACHE: &str = "WOEPLANET_CMDS_ANCESTOR_CACHE";
const ENV_ANCESTOR_WOEID: &str = "WOEPLANET_CMDS_ANCESTOR_WOEID";
const ENV_ANCESTOR_PLACETYPE: &str = "WOEPLANET_CMDS_ANCESTOR_PLACETYPE";
const ENV_MAXWOEID_CACHE: &str = "WOEPLANET_CMDS_MAXWOEID_CACHE";

/// Run the CLI with the current process arguments and environment,
/// writing results to standard output.
///
/// # Errors
///
/// Returns [`CliError`] when arguments, configuration or the cache fail.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    run_command(cli.command, &mut stdout)
}

fn run_command(command: Command, writer: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Init(args) => commands::init(&args.into_config()?, writer),
        Command::Place(args) => commands::place(&args.into_config()?, writer),
        Command::Ancestor(args) => commands::ancestor(&args.into_config()?, writer),
        Command::Maxwoeid(args) => commands::maxwoeid(&args.into_config()?, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "woeplanet",
    about = "Inspect and prepare a WOE ID gazetteer cache",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create every cache table and index.
    Init(InitArgs),
    /// Print a place as JSON.
    Place(PlaceArgs),
    /// Print the nearest ancestor of a place with the given placetype.
    Ancestor(AncestorArgs),
    /// Print the highest WOE ID recorded in the cache.
    Maxwoeid(MaxwoeidArgs),
}

#[cfg(test)]
mod tests;
