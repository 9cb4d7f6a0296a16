//! Command-line interface and orchestration for json-harvest
//!
//! # Commands
//!
//! - **init**: write the default configuration template
//! - **validate**: load a configuration, build every schema and print the element trees
//! - **extract**: run one root's schema over a saved payload file, offline
//! - **poll**: poll the GitHub API for every root, once or on the configured schedule
//!
//! The `run` function parses command-line arguments using clap and routes to the
//! matching handler. All output goes through a [`Host`], which lets tests capture it.
//! Collected metrics are printed with the generators in [`crate::reports`].

mod common;
mod config;
mod extract;
mod host;
mod init;
mod poll;
mod run;
mod validate;

pub use common::OutputFormat;
pub use config::{Config, DEFAULT_TEMPLATE_YAML};
pub use extract::{ExtractArgs, extract_payload};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use poll::{PollArgs, poll_repository};
pub use run::run;
pub use validate::{ValidateArgs, validate_config};
