//! In-memory metrics store
//!
//! A [`Matrix`] holds the instances and metric descriptors collected for one
//! schema root. Instances are keyed by a composite string and carry labels;
//! metric descriptors hold one optional integer value per instance.
//!
//! Extraction never talks to a matrix directly. It goes through the [`Sink`]
//! trait, addressed by root id, which [`Matrices`] implements by routing each
//! call to the matrix registered for that root.

mod error;
mod instance;
mod matrices;
mod metric;
mod sink;
mod store;

pub use error::MatrixError;
pub use instance::{Instance, InstanceId};
pub use matrices::Matrices;
pub use metric::{MetricDescriptor, MetricId};
pub use sink::Sink;
pub use store::Matrix;

/// Key of the single instance owned by roots whose schema declares no key elements
pub const FIXED_INSTANCE_KEY: &str = "repo";
