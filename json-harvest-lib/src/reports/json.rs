use crate::Result;
use crate::matrix::Matrices;
use core::fmt::Write;
use serde_json::json;

#[expect(unused_results, reason = "Map::insert intentionally overwrites values")]
pub fn generate<W: Write>(matrices: &Matrices, writer: &mut W) -> Result<()> {
    let mut matrix_data = Vec::with_capacity(matrices.len());

    for (_, matrix) in matrices.iter() {
        let mut instances = Vec::with_capacity(matrix.instance_count());

        for (id, instance) in matrix.instances() {
            let mut metrics_obj = serde_json::Map::new();
            for (_, metric) in matrix.metrics() {
                if let Some(value) = metric.value(id) {
                    metrics_obj.insert(metric.name().to_string(), json!(value));
                }
            }

            instances.push(json!({
                "key": instance.key(),
                "labels": instance.labels(),
                "metrics": metrics_obj,
            }));
        }

        matrix_data.push(json!({
            "uuid": matrix.uuid(),
            "object": matrix.object(),
            "global_labels": matrix.global_labels(),
            "instances": instances,
        }));
    }

    let output = json!({
        "matrices": matrix_data
    });

    write!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}
