//! Rendering collected matrices
//!
//! Two generators are provided, each accessed through a `generate` function that
//! writes into any [`core::fmt::Write`]:
//! - **Prometheus**: text exposition format, one gauge sample per set value
//! - **JSON**: machine-readable dump of every matrix, instance, label and value

mod common;
mod json;
mod prometheus;

pub use common::family_name;
pub use json::generate as generate_json;
pub use prometheus::generate as generate_prometheus;
