use super::Host;
use super::common::{OutputFormat, build_collector, fail, write_report};
use super::config::Config;
use crate::Result;
use crate::collector::files::FILES_ROOT;
use crate::collector::{Client, Collector, Schedule};
use camino::Utf8PathBuf;
use clap::Parser;
use std::io::Write;
use std::time::Instant;

const LOG_TARGET: &str = "      poll";

#[derive(Parser, Debug)]
pub struct PollArgs {
    /// Path to configuration file
    #[arg(long, short = 'c', value_name = "PATH", default_value = "harvest.yml")]
    pub config: Utf8PathBuf,

    /// Poll every endpoint once, print the results and exit
    #[arg(long)]
    pub once: bool,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "prometheus")]
    pub format: OutputFormat,

    /// GitHub personal access token, overriding the configured one
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN")]
    pub github_token: Option<String>,
}

pub async fn poll_repository<H: Host>(host: &mut H, args: &PollArgs) -> Result<()> {
    let setup = Config::load(&args.config).and_then(|config| {
        let token = args.github_token.as_deref().or(config.token.as_deref());
        let client = Client::new(token, &config.api_url, &config.repo_path()?)?;
        let collector = build_collector(&config, config.files)?;
        Ok((config, client, collector))
    });

    let (config, client, mut collector) = match setup {
        Ok(parts) => parts,
        Err(e) => return fail(host, "Poll setup", e),
    };

    if args.once {
        return match poll_all(&mut collector, &client).await {
            Ok(()) => write_report(host, collector.matrices(), args.format),
            Err(e) => fail(host, "Poll", e),
        };
    }

    let mut schedule = Schedule::new(Instant::now());
    for root in collector.roots() {
        schedule.add(root.name(), config.interval(root.display_name()));
    }
    if collector.files_enabled() {
        schedule.add(FILES_ROOT, config.interval(FILES_ROOT));
    }

    loop {
        let Some((task, deadline)) = schedule.next_due().map(|(t, d)| (t.to_string(), d)) else {
            return Ok(());
        };

        let now = Instant::now();
        if deadline > now {
            tokio::time::sleep(deadline - now).await;
        }

        if let Err(e) = poll_task(&mut collector, &client, &task).await {
            report_poll_failure(host, &task, &e);
        }

        let _ = schedule.mark_polled(&task, Instant::now());
        write_report(host, collector.matrices(), args.format)?;
    }
}

/// Surface a failed scheduled poll on the error stream; the loop keeps running.
fn report_poll_failure<H: Host>(host: &mut H, task: &str, e: &ohno::AppError) {
    log::error!(target: LOG_TARGET, "({task}) poll failed: {e}");
    let _ = writeln!(host.error(), "❌ Poll of '{task}' failed: {e}");
}

/// Poll every root once, then scan files if enabled; the first failure stops the pass
async fn poll_all(collector: &mut Collector, client: &Client) -> Result<()> {
    let roots: Vec<String> = collector.roots().iter().map(|r| r.name().to_string()).collect();
    for root in &roots {
        let _ = collector.poll(client, root).await?;
    }

    if collector.files_enabled() {
        let _ = collector.poll_files(client).await?;
    }

    Ok(())
}

async fn poll_task(collector: &mut Collector, client: &Client, task: &str) -> Result<()> {
    if collector.files_enabled() && task == FILES_ROOT {
        let _ = collector.poll_files(client).await?;
    } else {
        let _ = collector.poll(client, task).await?;
    }
    Ok(())
}
