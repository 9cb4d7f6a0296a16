//! Command dispatch logic for json-harvest

use super::common::{LogLevel, init_logging};
use super::{ExtractArgs, InitArgs, PollArgs, ValidateArgs, extract_payload, init_config, poll_repository, validate_config};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "json-harvest", bin_name = "json-harvest", version, author, long_about = None)]
#[command(about = "Harvest metrics from JSON APIs using declarative schemas")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: HarvestSubcommand,
}

#[derive(Subcommand, Debug)]
enum HarvestSubcommand {
    /// Generate a default configuration file
    Init(InitArgs),
    /// Validate a configuration file and print its schemas
    Validate(ValidateArgs),
    /// Extract metrics from a saved payload
    Extract(ExtractArgs),
    /// Poll the GitHub API and print collected metrics
    Poll(PollArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments, program name first (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if the executed command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let cli = Cli::parse_from(args);
    init_logging(cli.log_level);

    match &cli.command {
        HarvestSubcommand::Init(init_args) => init_config(host, init_args),
        HarvestSubcommand::Validate(validate_args) => validate_config(host, validate_args),
        HarvestSubcommand::Extract(extract_args) => extract_payload(host, extract_args),
        HarvestSubcommand::Poll(poll_args) => poll_repository(host, poll_args).await,
    }
}
