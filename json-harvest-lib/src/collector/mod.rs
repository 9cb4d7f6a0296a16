//! Collecting metrics from the GitHub REST API
//!
//! A [`Collector`] owns one schema and one matrix per configured endpoint. Each poll
//! fetches an endpoint with the [`Client`] and hands the payload to the extractor.
//! A [`Schedule`] decides which endpoint is polled next, and the [`files`] scanner
//! optionally records per-file size statistics for the whole repository.

mod client;
pub mod files;
mod github;
mod repo_path;
mod schedule;

pub use client::Client;
pub use github::Collector;
pub use repo_path::RepoPath;
pub use schedule::Schedule;
