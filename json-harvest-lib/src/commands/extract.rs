use super::Host;
use super::common::{OutputFormat, build_collector, fail, write_report};
use super::config::Config;
use crate::Result;
use camino::Utf8PathBuf;
use clap::Parser;
use ohno::{IntoAppError, app_err};
use std::fs;

#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// Path to configuration file
    #[arg(long, short = 'c', value_name = "PATH", default_value = "harvest.yml")]
    pub config: Utf8PathBuf,

    /// Counters root to extract, by name or exported name
    #[arg(long, value_name = "NAME")]
    pub root: String,

    /// File holding the JSON payload returned by the root's endpoint
    #[arg(long, value_name = "PATH")]
    pub payload: Utf8PathBuf,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "prometheus")]
    pub format: OutputFormat,
}

/// Run one root's schema over a saved payload, without any network access
pub fn extract_payload<H: Host>(host: &mut H, args: &ExtractArgs) -> Result<()> {
    let result = extract_inner(args);
    match result {
        Ok(collector) => write_report(host, collector.matrices(), args.format),
        Err(e) => fail(host, "Extraction", e),
    }
}

fn extract_inner(args: &ExtractArgs) -> Result<crate::collector::Collector> {
    let config = Config::load(&args.config)?;
    let mut collector = build_collector(&config, false)?;

    let root = collector
        .find_root(&args.root)
        .map(|r| r.name().to_string())
        .ok_or_else(|| app_err!("no counters root named '{}'", args.root))?;

    let data = fs::read(&args.payload).into_app_err_with(|| format!("reading payload file '{}'", args.payload))?;
    collector.ingest(&root, &data)?;

    Ok(collector)
}
