use super::decode::{self, Object};
use super::{ExtractError, Labels};
use crate::matrix::{FIXED_INSTANCE_KEY, InstanceId, Sink};
use crate::schema::Element;

const LOG_TARGET: &str = "   extract";
const KEY_SEPARATOR: char = '.';

/// Compute the instance key and labels visible at `elem`.
///
/// Every direct label child is decoded from `object` as a string and stored under its display
/// name; key children also append their value to the composite key. The key stays `None` until
/// some key label decodes, even to an empty string. A label that fails to decode is skipped.
/// The inherited labels are copied, never modified.
#[must_use]
pub fn resolve_key_and_labels(
    elem: &Element,
    object: &Object,
    inherited_key: Option<&str>,
    inherited_labels: &Labels,
) -> (Option<String>, Labels) {
    let mut key = inherited_key.map(str::to_string);
    let mut labels = inherited_labels.clone();

    for child in elem.children().iter().filter(|c| c.is_label()) {
        let Ok(value) = decode::string(object, child.name()) else {
            log::trace!(target: LOG_TARGET, "label '{}' not decodable, skipping", child.name());
            continue;
        };

        if child.is_key() {
            match &mut key {
                Some(key) => {
                    key.push(KEY_SEPARATOR);
                    key.push_str(&value);
                }
                None => key = Some(value.clone()),
            }
        }

        let _ = labels.insert(child.display_name().to_string(), value);
    }

    (key, labels)
}

/// Walk `elem` and `object` in lock-step, writing instances, labels and metric values into `sink`.
///
/// Only the first nested child of `elem` is descended into; any later nested siblings are
/// ignored. Metrics are only read at leaf levels, where `elem` has no nested child at all.
/// The first failure aborts the whole walk.
pub fn extract<S: Sink + ?Sized>(
    sink: &mut S,
    root: &str,
    elem: &Element,
    object: &Object,
    inherited_key: Option<&str>,
    inherited_labels: &Labels,
) -> Result<(), ExtractError> {
    let (key, labels) = resolve_key_and_labels(elem, object, inherited_key, inherited_labels);

    if let Some(nested) = elem.first_nested_child() {
        let items = decode::objects(object, nested.name()).map_err(|source| ExtractError::NestedDecode {
            field: nested.name().to_string(),
            source,
        })?;

        for item in items {
            extract(sink, root, nested, item, key.as_deref(), &labels)?;
        }

        return Ok(());
    }

    let instance = resolve_instance(sink, root, key.as_deref(), &labels)?;

    for (name, value) in &labels {
        sink.set_label(root, instance, name, value)?;
    }

    extract_metric_values(sink, root, elem, instance, object)
}

fn resolve_instance<S: Sink + ?Sized>(sink: &mut S, root: &str, key: Option<&str>, labels: &Labels) -> Result<InstanceId, ExtractError> {
    let Some(key) = key else {
        return sink
            .instance(root, FIXED_INSTANCE_KEY)
            .ok_or_else(|| ExtractError::MissingInstance(FIXED_INSTANCE_KEY.to_string()));
    };

    if let Some(instance) = sink.instance(root, key) {
        return Ok(instance);
    }

    log::debug!(target: LOG_TARGET, "<{root}> adding new instance [{key}] ({labels:?})");
    Ok(sink.new_instance(root, key)?)
}

fn extract_metric_values<S: Sink + ?Sized>(
    sink: &mut S,
    root: &str,
    elem: &Element,
    instance: InstanceId,
    object: &Object,
) -> Result<(), ExtractError> {
    for child in elem.children().iter().filter(|c| c.is_metric()) {
        let value = decode::int(object, child.name()).map_err(|source| {
            log::error!(target: LOG_TARGET, "<{root}> can't extract value ({}): {source}", child.name());
            ExtractError::Decode {
                field: child.name().to_string(),
                source,
            }
        })?;

        let Some(metric) = sink.metric(root, child.name()) else {
            log::warn!(target: LOG_TARGET, "<{root}> missing metric ({})", child.name());
            return Err(ExtractError::MissingMetric(child.name().to_string()));
        };

        sink.set_int_value(root, metric, instance, value)?;
        log::debug!(target: LOG_TARGET, "<{root}> set ({}) => [{value}]", child.name());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{Matrices, Matrix, MatrixError, MetricId};
    use crate::schema::{ConfigNode, build_element_tree, parse_element_spec};
    use serde_json::{Value, json};

    const ROOT: &str = "root";

    fn obj(value: Value) -> Object {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    fn schema(children: Vec<ConfigNode>) -> Element {
        build_element_tree(&ConfigNode::named(ROOT, children))
    }

    fn sink_with_metrics(metrics: &[&str]) -> Matrices {
        let mut matrix = Matrix::new("Github.root", ROOT);
        for m in metrics {
            let _ = matrix.new_metric(m, m).unwrap();
        }
        let mut sink = Matrices::new();
        sink.insert(ROOT, matrix);
        sink
    }

    fn matrix(sink: &Matrices) -> &Matrix {
        sink.get(ROOT).unwrap()
    }

    #[test]
    fn test_resolve_key_and_labels_basic() {
        let elem = schema(vec![ConfigNode::leaf("^^id"), ConfigNode::leaf("^name => title"), ConfigNode::leaf("count")]);
        let object = obj(json!({"id": "x", "name": "hello", "count": 1}));

        let (key, labels) = resolve_key_and_labels(&elem, &object, None, &Labels::new());

        assert_eq!(key.as_deref(), Some("x"));
        assert_eq!(labels.len(), 2);
        assert_eq!(labels.get("id").map(String::as_str), Some("x"));
        assert_eq!(labels.get("title").map(String::as_str), Some("hello"));
    }

    #[test]
    fn test_resolve_key_extends_inherited_key() {
        let elem = schema(vec![ConfigNode::leaf("^^path")]);
        let object = obj(json!({"path": "/docs"}));

        let (key, _) = resolve_key_and_labels(&elem, &object, Some("github.com"), &Labels::new());
        assert_eq!(key.as_deref(), Some("github.com./docs"));
    }

    #[test]
    fn test_resolve_skips_undecodable_labels() {
        let elem = schema(vec![ConfigNode::leaf("^^id"), ConfigNode::leaf("^^n"), ConfigNode::leaf("^missing")]);
        let object = obj(json!({"id": "x", "n": 5}));

        let (key, labels) = resolve_key_and_labels(&elem, &object, None, &Labels::new());
        assert_eq!(key.as_deref(), Some("x"));
        assert_eq!(labels.keys().collect::<Vec<_>>(), ["id"]);
    }

    #[test]
    fn test_resolve_does_not_touch_inherited_labels() {
        let elem = schema(vec![ConfigNode::leaf("^name")]);
        let object = obj(json!({"name": "child"}));
        let mut inherited = Labels::new();
        let _ = inherited.insert("parent".into(), "p".into());

        let (_, labels) = resolve_key_and_labels(&elem, &object, None, &inherited);

        assert_eq!(inherited.len(), 1);
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn test_flat_leaf_creates_keyed_instance() {
        let elem = schema(vec![ConfigNode::leaf("^^id"), ConfigNode::leaf("count")]);
        let mut sink = sink_with_metrics(&["count"]);

        extract(&mut sink, ROOT, &elem, &obj(json!({"id": "x", "count": 3})), None, &Labels::new()).unwrap();

        let m = matrix(&sink);
        assert_eq!(m.instance_count(), 1);
        let id = m.instance("x").unwrap();
        assert_eq!(m.instance_by_id(id).unwrap().label("id"), Some("x"));
        assert_eq!(m.value("count", "x"), Some(3));
    }

    #[test]
    fn test_empty_key_value_creates_keyed_instance() {
        let elem = schema(vec![ConfigNode::leaf("^^id"), ConfigNode::leaf("count")]);
        let mut sink = sink_with_metrics(&["count"]);

        extract(&mut sink, ROOT, &elem, &obj(json!({"id": "", "count": 3})), None, &Labels::new()).unwrap();

        let m = matrix(&sink);
        assert_eq!(m.instance_count(), 1);
        assert_eq!(m.instance(FIXED_INSTANCE_KEY), None);
        assert_eq!(m.value("count", ""), Some(3));
    }

    #[test]
    fn test_empty_first_key_segment_keeps_separator() {
        let elem = schema(vec![ConfigNode::leaf("^^host"), ConfigNode::leaf("^^path"), ConfigNode::leaf("count")]);
        let object = obj(json!({"host": "", "path": "/docs", "count": 1}));

        let (key, _) = resolve_key_and_labels(&elem, &object, None, &Labels::new());
        assert_eq!(key.as_deref(), Some("./docs"));

        let mut sink = sink_with_metrics(&["count"]);
        extract(&mut sink, ROOT, &elem, &object, None, &Labels::new()).unwrap();
        assert_eq!(matrix(&sink).value("count", "./docs"), Some(1));
    }

    #[test]
    fn test_no_decoded_key_resolves_to_none() {
        let elem = schema(vec![ConfigNode::leaf("^^id"), ConfigNode::leaf("count")]);
        let object = obj(json!({"id": 7, "count": 1}));

        let (key, _) = resolve_key_and_labels(&elem, &object, None, &Labels::new());
        assert_eq!(key, None);
    }

    #[test]
    fn test_existing_instance_is_reused() {
        let elem = schema(vec![ConfigNode::leaf("^^id"), ConfigNode::leaf("count")]);
        let mut sink = sink_with_metrics(&["count"]);

        extract(&mut sink, ROOT, &elem, &obj(json!({"id": "x", "count": 3})), None, &Labels::new()).unwrap();
        extract(&mut sink, ROOT, &elem, &obj(json!({"id": "x", "count": 4})), None, &Labels::new()).unwrap();

        assert_eq!(matrix(&sink).instance_count(), 1);
        assert_eq!(matrix(&sink).value("count", "x"), Some(4));
    }

    #[test]
    fn test_only_first_nested_child_is_visited() {
        let elem = schema(vec![
            ConfigNode::named("items", vec![ConfigNode::leaf("^^id"), ConfigNode::leaf("count")]),
            ConfigNode::named("extras", vec![ConfigNode::leaf("^^id"), ConfigNode::leaf("count")]),
        ]);
        let mut sink = sink_with_metrics(&["count"]);
        let payload = obj(json!({
            "items": [{"id": "a", "count": 1}],
            "extras": [{"id": "b", "count": 99}]
        }));

        extract(&mut sink, ROOT, &elem, &payload, None, &Labels::new()).unwrap();

        let m = matrix(&sink);
        assert_eq!(m.instance_count(), 1);
        assert_eq!(m.value("count", "a"), Some(1));
        assert_eq!(m.instance("b"), None);
    }

    #[test]
    fn test_later_nested_sibling_is_never_decoded() {
        let elem = schema(vec![
            ConfigNode::named("items", vec![ConfigNode::leaf("count")]),
            ConfigNode::named("extras", vec![ConfigNode::leaf("count")]),
        ]);
        let mut sink = sink_with_metrics(&["count"]);
        let _ = sink.new_instance(ROOT, FIXED_INSTANCE_KEY).unwrap();

        // `extras` is not even an array: decoding it would fail
        let payload = obj(json!({"items": [{"count": 1}], "extras": "garbage"}));
        extract(&mut sink, ROOT, &elem, &payload, None, &Labels::new()).unwrap();

        assert_eq!(matrix(&sink).value("count", FIXED_INSTANCE_KEY), Some(1));
    }

    #[test]
    fn test_no_metrics_read_at_nested_level() {
        let elem = schema(vec![ConfigNode::leaf("total"), ConfigNode::named("items", vec![ConfigNode::leaf("count")])]);
        let mut sink = sink_with_metrics(&["count"]);
        let _ = sink.new_instance(ROOT, FIXED_INSTANCE_KEY).unwrap();

        // `total` has no descriptor and is not in the payload; it must not be looked at
        extract(&mut sink, ROOT, &elem, &obj(json!({"items": [{"count": 2}]})), None, &Labels::new()).unwrap();
        assert_eq!(matrix(&sink).value("count", FIXED_INSTANCE_KEY), Some(2));
    }

    #[test]
    fn test_labels_and_keys_inherited_across_levels() {
        let elem = schema(vec![
            ConfigNode::leaf("^^owner"),
            ConfigNode::leaf("^team"),
            ConfigNode::named("repos", vec![ConfigNode::leaf("^^name => repo"), ConfigNode::leaf("stars")]),
        ]);
        let mut sink = sink_with_metrics(&["stars"]);
        let payload = obj(json!({
            "owner": "acme",
            "team": "core",
            "repos": [{"name": "a", "stars": 1}, {"name": "b", "stars": 2}]
        }));

        extract(&mut sink, ROOT, &elem, &payload, None, &Labels::new()).unwrap();

        let m = matrix(&sink);
        assert_eq!(m.instance_count(), 2);
        assert_eq!(m.value("stars", "acme.a"), Some(1));
        assert_eq!(m.value("stars", "acme.b"), Some(2));

        let b = m.instance_by_id(m.instance("acme.b").unwrap()).unwrap();
        assert_eq!(b.label("owner"), Some("acme"));
        assert_eq!(b.label("team"), Some("core"));
        assert_eq!(b.label("repo"), Some("b"));
    }

    #[test]
    fn test_sibling_items_do_not_share_labels() {
        let elem = schema(vec![ConfigNode::named(
            "items",
            vec![ConfigNode::leaf("^^id"), ConfigNode::leaf("^color"), ConfigNode::leaf("count")],
        )]);
        let mut sink = sink_with_metrics(&["count"]);
        let payload = obj(json!({"items": [{"id": "a", "color": "red", "count": 1}, {"id": "b", "count": 2}]}));

        extract(&mut sink, ROOT, &elem, &payload, None, &Labels::new()).unwrap();

        let m = matrix(&sink);
        let b = m.instance_by_id(m.instance("b").unwrap()).unwrap();
        assert_eq!(b.label("color"), None);
    }

    #[test]
    fn test_empty_nested_collection_terminates_branch() {
        let elem = schema(vec![ConfigNode::named("items", vec![ConfigNode::leaf("count")])]);
        let mut sink = sink_with_metrics(&[]);

        extract(&mut sink, ROOT, &elem, &obj(json!({"items": []})), None, &Labels::new()).unwrap();
        extract(&mut sink, ROOT, &elem, &obj(json!({"items": null})), None, &Labels::new()).unwrap();
        assert_eq!(matrix(&sink).instance_count(), 0);
    }

    #[test]
    fn test_nested_decode_error() {
        let elem = schema(vec![ConfigNode::named("items", vec![ConfigNode::leaf("count")])]);
        let mut sink = sink_with_metrics(&["count"]);

        let err = extract(&mut sink, ROOT, &elem, &obj(json!({"items": 5})), None, &Labels::new()).unwrap_err();
        assert!(matches!(err, ExtractError::NestedDecode { ref field, .. } if field == "items"), "{err}");

        let err = extract(&mut sink, ROOT, &elem, &obj(json!({})), None, &Labels::new()).unwrap_err();
        assert!(matches!(err, ExtractError::NestedDecode { .. }), "{err}");
    }

    #[test]
    fn test_recursive_failure_aborts_remaining_items() {
        let elem = schema(vec![ConfigNode::named("items", vec![ConfigNode::leaf("^^id"), ConfigNode::leaf("count")])]);
        let mut sink = sink_with_metrics(&["count"]);
        let payload = obj(json!({"items": [
            {"id": "a", "count": 1},
            {"id": "b", "count": "oops"},
            {"id": "c", "count": 3}
        ]}));

        let err = extract(&mut sink, ROOT, &elem, &payload, None, &Labels::new()).unwrap_err();
        assert!(matches!(err, ExtractError::Decode { ref field, .. } if field == "count"), "{err}");

        let m = matrix(&sink);
        assert_eq!(m.value("count", "a"), Some(1));
        assert!(m.instance("b").is_some(), "instance created before the failure stays");
        assert_eq!(m.value("count", "b"), None);
        assert_eq!(m.instance("c"), None);
    }

    #[test]
    fn test_missing_metric_keeps_labels() {
        let elem = schema(vec![ConfigNode::leaf("^^id"), ConfigNode::leaf("^kind"), ConfigNode::leaf("count")]);
        let mut sink = sink_with_metrics(&[]);

        let err = extract(&mut sink, ROOT, &elem, &obj(json!({"id": "x", "kind": "k", "count": 3})), None, &Labels::new()).unwrap_err();
        assert!(matches!(err, ExtractError::MissingMetric(ref name) if name == "count"), "{err}");

        let m = matrix(&sink);
        let inst = m.instance_by_id(m.instance("x").unwrap()).unwrap();
        assert_eq!(inst.label("kind"), Some("k"));
        assert_eq!(inst.label("id"), Some("x"));
    }

    #[test]
    fn test_decode_error_skips_remaining_metrics() {
        let elem = schema(vec![ConfigNode::leaf("^^id"), ConfigNode::leaf("a"), ConfigNode::leaf("b"), ConfigNode::leaf("c")]);
        let mut sink = sink_with_metrics(&["a", "b", "c"]);

        let err = extract(&mut sink, ROOT, &elem, &obj(json!({"id": "x", "a": 1, "b": 1.5, "c": 3})), None, &Labels::new()).unwrap_err();
        assert!(matches!(err, ExtractError::Decode { ref field, .. } if field == "b"), "{err}");

        let m = matrix(&sink);
        assert_eq!(m.value("a", "x"), Some(1));
        assert_eq!(m.value("c", "x"), None);
    }

    #[test]
    fn test_metric_looked_up_by_name_not_display_name() {
        let elem = schema(vec![ConfigNode::leaf("^^id"), ConfigNode::leaf("stargazers_count => stars")]);
        let mut sink = sink_with_metrics(&["stargazers_count"]);

        extract(&mut sink, ROOT, &elem, &obj(json!({"id": "x", "stargazers_count": 10})), None, &Labels::new()).unwrap();
        assert_eq!(matrix(&sink).value("stargazers_count", "x"), Some(10));
    }

    #[test]
    fn test_keyless_root_uses_fixed_instance() {
        let elem = schema(vec![ConfigNode::leaf("count")]);
        let mut sink = sink_with_metrics(&["count"]);
        let _ = sink.new_instance(ROOT, FIXED_INSTANCE_KEY).unwrap();

        extract(&mut sink, ROOT, &elem, &obj(json!({"count": 5})), None, &Labels::new()).unwrap();

        assert_eq!(matrix(&sink).instance_count(), 1);
        assert_eq!(matrix(&sink).value("count", FIXED_INSTANCE_KEY), Some(5));
    }

    #[test]
    fn test_keyless_root_without_fixed_instance() {
        let elem = schema(vec![ConfigNode::leaf("count")]);
        let mut sink = sink_with_metrics(&["count"]);

        let err = extract(&mut sink, ROOT, &elem, &obj(json!({"count": 5})), None, &Labels::new()).unwrap_err();
        assert!(matches!(err, ExtractError::MissingInstance(ref key) if key == FIXED_INSTANCE_KEY), "{err}");
        assert_eq!(matrix(&sink).instance_count(), 0);
    }

    #[test]
    fn test_plain_labels_attach_to_fixed_instance() {
        let elem = schema(vec![ConfigNode::leaf("^default_branch => branch"), ConfigNode::leaf("forks")]);
        let mut sink = sink_with_metrics(&["forks"]);
        let _ = sink.new_instance(ROOT, FIXED_INSTANCE_KEY).unwrap();

        extract(&mut sink, ROOT, &elem, &obj(json!({"default_branch": "main", "forks": 2})), None, &Labels::new()).unwrap();

        let m = matrix(&sink);
        let inst = m.instance_by_id(m.instance(FIXED_INSTANCE_KEY).unwrap()).unwrap();
        assert_eq!(inst.label("branch"), Some("main"));
    }

    #[test]
    fn test_unknown_root_surfaces_matrix_error() {
        let elem = schema(vec![ConfigNode::leaf("^^id"), ConfigNode::leaf("count")]);
        let mut sink = Matrices::new();

        let err = extract(&mut sink, "ghost", &elem, &obj(json!({"id": "x", "count": 1})), None, &Labels::new()).unwrap_err();
        assert!(matches!(err, ExtractError::Matrix(MatrixError::UnknownRoot(_))), "{err}");
    }

    #[test]
    fn test_works_with_custom_sink() {
        #[derive(Default)]
        struct Recorder {
            writes: Vec<(String, i64)>,
        }

        impl Sink for Recorder {
            fn instance(&self, _root: &str, _key: &str) -> Option<InstanceId> {
                None
            }

            fn new_instance(&mut self, _root: &str, _key: &str) -> Result<InstanceId, MatrixError> {
                let mut m = Matrix::new("u", "o");
                Ok(m.new_instance("x")?)
            }

            fn metric(&self, _root: &str, _name: &str) -> Option<MetricId> {
                let mut m = Matrix::new("u", "o");
                m.new_metric("count", "count").ok()
            }

            fn set_label(&mut self, _root: &str, _instance: InstanceId, _name: &str, _value: &str) -> Result<(), MatrixError> {
                Ok(())
            }

            fn set_int_value(&mut self, root: &str, _metric: MetricId, _instance: InstanceId, value: i64) -> Result<(), MatrixError> {
                self.writes.push((root.to_string(), value));
                Ok(())
            }
        }

        let elem = build_element_tree(&ConfigNode::named("r", vec![ConfigNode::leaf("^^id"), ConfigNode::leaf("count")]));
        let mut sink = Recorder::default();
        extract(&mut sink, "r", &elem, &obj(json!({"id": "x", "count": 8})), None, &Labels::new()).unwrap();
        assert_eq!(sink.writes, [("r".to_string(), 8)]);

        assert!(parse_element_spec("count").is_metric());
    }
}
