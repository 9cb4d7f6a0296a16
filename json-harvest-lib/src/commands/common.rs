//! Shared argument types and helpers for all commands.

use super::Host;
use super::config::Config;
use crate::Result;
use crate::collector::Collector;
use crate::matrix::Matrices;
use crate::reports::{generate_json, generate_prometheus};
use clap::ValueEnum;
use ohno::IntoAppError;
use std::io::Write;

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Format used to print collected metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    /// Prometheus text exposition format
    Prometheus,

    /// Pretty-printed JSON document
    Json,
}

pub fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    // a logger may already be installed when commands run more than once in a process
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}

/// Build a collector for every counters root in `config`
pub fn build_collector(config: &Config, files: bool) -> Result<Collector> {
    Collector::new(config.repo_path()?, &config.roots(), files)
}

/// Render `matrices` in `format` to the host's output
pub fn write_report<H: Host>(host: &mut H, matrices: &Matrices, format: OutputFormat) -> Result<()> {
    let mut text = String::new();
    match format {
        OutputFormat::Prometheus => generate_prometheus(matrices, &mut text)?,
        OutputFormat::Json => {
            generate_json(matrices, &mut text)?;
            text.push('\n');
        }
    }

    host.output()
        .write_all(text.as_bytes())
        .into_app_err_with(|| format!("writing {format} report"))?;
    Ok(())
}

/// Report a failed command on the host's error stream and request exit status 1
pub fn fail<H: Host, T>(host: &mut H, what: &str, e: ohno::AppError) -> Result<T> {
    let _ = writeln!(host.error(), "❌ {what} failed: {e}");
    host.exit(1);
    Err(e)
}
