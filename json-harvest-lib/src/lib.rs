#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for json-harvest
//!
//! json-harvest reads JSON payloads, typically GitHub REST API responses, through small
//! declarative schemas and turns them into keyed instances carrying labels and integer
//! metrics.
//!
//! # Module Organization
//!
//! - [`schema`]: parsing configuration trees into element schemas
//! - [`extract`]: walking a schema and a payload in lock-step
//! - [`matrix`]: the in-memory metrics store extraction writes into
//! - [`collector`]: GitHub client, per-endpoint polling, file scanning and scheduling
//! - [`reports`]: Prometheus and JSON rendering of collected metrics
//! - [`commands`]: command-line interface and orchestration

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod collector;
pub mod commands;
pub mod extract;
pub mod matrix;
pub mod reports;
pub mod schema;

pub use crate::commands::{Host, run};
