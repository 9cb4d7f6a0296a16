use super::common::{escape_label_value, family_name, merged_labels, sanitize_name};
use crate::Result;
use crate::matrix::Matrices;
use core::fmt::Write;
use std::collections::HashMap;

/// Render every set value in the Prometheus text exposition format.
///
/// Each sample is named `<object>_<metric>` and carries the matrix's global labels plus the
/// instance labels, sorted by name. Unset values are skipped. Samples of one family are grouped
/// under a single `# TYPE` line, even when they come from different matrices or metrics.
pub fn generate<W: Write>(matrices: &Matrices, writer: &mut W) -> Result<()> {
    let mut families: Vec<(String, Vec<String>)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (_, matrix) in matrices.iter() {
        for (_, metric) in matrix.metrics() {
            let name = family_name(matrix.object(), metric.name());

            for (id, instance) in matrix.instances() {
                let Some(value) = metric.value(id) else {
                    continue;
                };

                let labels: Vec<_> = merged_labels(matrix, instance)
                    .into_iter()
                    .map(|(k, v)| format!("{}=\"{}\"", sanitize_name(k), escape_label_value(v)))
                    .collect();

                let sample = if labels.is_empty() {
                    format!("{name} {value}")
                } else {
                    format!("{name}{{{}}} {value}", labels.join(","))
                };

                let pos = *positions.entry(name.clone()).or_insert_with(|| {
                    families.push((name.clone(), Vec::new()));
                    families.len() - 1
                });
                families[pos].1.push(sample);
            }
        }
    }

    for (name, samples) in &families {
        writeln!(writer, "# TYPE {name} gauge")?;
        for sample in samples {
            writeln!(writer, "{sample}")?;
        }
    }

    Ok(())
}
