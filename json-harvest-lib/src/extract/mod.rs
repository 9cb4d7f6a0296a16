//! Schema-driven extraction of JSON payloads into a [`Sink`](crate::matrix::Sink)
//!
//! [`extract`] walks an [`Element`](crate::schema::Element) tree and a JSON object
//! in lock-step. Labels and key segments are accumulated top-down; metric values
//! are only read at leaf levels, where the instance they belong to is known.

mod decode;
mod error;
mod extractor;

use std::collections::BTreeMap;

pub use decode::Object;
pub use error::ExtractError;
pub use extractor::{extract, resolve_key_and_labels};

/// Label values accumulated during a walk, keyed by label display name
pub type Labels = BTreeMap<String, String>;
