//! Declarative schemas describing how to read a JSON payload
//!
//! A schema is a tree of [`Element`]s built once from a generic configuration tree
//! ([`ConfigNode`]) and shared read-only by every poll of the same root.
//!
//! # Implementation Model
//!
//! Each configuration node contributes one element specification string:
//!
//! ```text
//! element  := ["^^"|"^"] body
//! body     := name [ "=>" display_name ]
//! ```
//!
//! - `^^` marks a key label: its value becomes part of the instance identity
//! - `^` marks a plain label
//! - no prefix marks a metric
//!
//! A node with children is a nested element: the JSON field it names holds an
//! array of objects, each interpreted by the children.

mod config_node;
mod element;
mod tree;

pub use config_node::ConfigNode;
pub use element::{Element, ElementKind, parse_element_spec};
pub use tree::{build_element_tree, dump, walk};
