//! Common utilities shared across report generators.

use crate::matrix::{Instance, Matrix};
use std::collections::BTreeMap;

/// Replace every character outside `[a-zA-Z0-9_]` with `_`, and prefix a leading digit with `_`.
pub fn sanitize_name(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }

    out
}

/// Exposed name of `metric` within `object`, as `<object>_<metric>` after sanitizing both parts.
pub fn family_name(object: &str, metric: &str) -> String {
    format!("{}_{}", sanitize_name(object), sanitize_name(metric))
}

/// Escape a label value for the Prometheus text format.
pub fn escape_label_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

/// Global labels of `matrix` merged with the labels of `instance`; instance labels win.
pub fn merged_labels<'a>(matrix: &'a Matrix, instance: &'a Instance) -> BTreeMap<&'a str, &'a str> {
    matrix
        .global_labels()
        .iter()
        .chain(instance.labels())
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect()
}
