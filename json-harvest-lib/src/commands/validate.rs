use super::Host;
use super::common::{build_collector, fail};
use super::config::Config;
use crate::Result;
use crate::schema::dump;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use core::fmt::Write as _;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file
    #[arg(long, short = 'c', value_name = "PATH", default_value = "harvest.yml")]
    pub config: Utf8PathBuf,
}

/// Load the configuration and build every schema, returning a printable summary
fn validate_config_inner(config_path: &Utf8Path) -> Result<String> {
    let config = Config::load(config_path)?;
    let collector = build_collector(&config, config.files)?;

    let mut summary = String::new();
    let _ = writeln!(summary, "Repository: {}", collector.repo());

    for root in collector.roots() {
        let _ = writeln!(summary);
        let _ = writeln!(summary, "Every {:?}:", config.interval(root.display_name()));
        summary.push_str(&dump(root));
    }

    if collector.files_enabled() {
        let _ = writeln!(summary);
        let _ = writeln!(summary, "File scanning every {:?}", config.interval("files"));
    }

    Ok(summary)
}

pub fn validate_config<H: Host>(host: &mut H, args: &ValidateArgs) -> Result<()> {
    match validate_config_inner(&args.config) {
        Ok(summary) => {
            let _ = writeln!(host.output(), "Configuration file is valid\nConfig file: {}\n\n{summary}", args.config);
            Ok(())
        }
        Err(e) => fail(host, "Configuration validation", e),
    }
}
