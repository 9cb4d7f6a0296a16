use super::{Instance, InstanceId, MatrixError, MetricDescriptor, MetricId};
use std::collections::{BTreeMap, HashMap};

/// Instances and metric descriptors collected for one schema root.
#[derive(Debug, Clone)]
pub struct Matrix {
    uuid: String,
    object: String,
    global_labels: BTreeMap<String, String>,
    instances: Vec<Instance>,
    instance_ids: HashMap<String, InstanceId>,
    metrics: Vec<MetricDescriptor>,
    metric_ids: HashMap<String, MetricId>,
}

impl Matrix {
    #[must_use]
    pub fn new(uuid: impl Into<String>, object: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            object: object.into(),
            global_labels: BTreeMap::new(),
            instances: Vec::new(),
            instance_ids: HashMap::new(),
            metrics: Vec::new(),
            metric_ids: HashMap::new(),
        }
    }

    #[must_use]
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    /// Name of the object this matrix describes, used as metric name prefix on export
    #[must_use]
    pub fn object(&self) -> &str {
        &self.object
    }

    /// Label applied to every instance on export
    pub fn set_global_label(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let _ = self.global_labels.insert(name.into(), value.into());
    }

    #[must_use]
    pub const fn global_labels(&self) -> &BTreeMap<String, String> {
        &self.global_labels
    }

    /// Register a new instance under `key`.
    pub fn new_instance(&mut self, key: &str) -> Result<InstanceId, MatrixError> {
        if self.instance_ids.contains_key(key) {
            return Err(MatrixError::DuplicateInstance(key.to_string()));
        }

        let id = InstanceId(self.instances.len());
        self.instances.push(Instance::new(key));
        let _ = self.instance_ids.insert(key.to_string(), id);
        Ok(id)
    }

    #[must_use]
    pub fn instance(&self, key: &str) -> Option<InstanceId> {
        self.instance_ids.get(key).copied()
    }

    #[must_use]
    pub fn instance_by_id(&self, id: InstanceId) -> Option<&Instance> {
        self.instances.get(id.index())
    }

    /// Instances in creation order
    pub fn instances(&self) -> impl Iterator<Item = (InstanceId, &Instance)> {
        self.instances.iter().enumerate().map(|(i, inst)| (InstanceId(i), inst))
    }

    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn set_label(&mut self, id: InstanceId, name: &str, value: &str) -> Result<(), MatrixError> {
        let instance = self.instances.get_mut(id.index()).ok_or(MatrixError::UnknownInstance(id.index()))?;
        instance.set_label(name, value);
        Ok(())
    }

    /// Register a metric looked up by `key` and exported as `name`.
    pub fn new_metric(&mut self, key: &str, name: &str) -> Result<MetricId, MatrixError> {
        if self.metric_ids.contains_key(key) {
            return Err(MatrixError::DuplicateMetric(key.to_string()));
        }

        let id = MetricId(self.metrics.len());
        self.metrics.push(MetricDescriptor::new(key, name));
        let _ = self.metric_ids.insert(key.to_string(), id);
        Ok(id)
    }

    #[must_use]
    pub fn metric(&self, key: &str) -> Option<MetricId> {
        self.metric_ids.get(key).copied()
    }

    #[must_use]
    pub fn metric_by_id(&self, id: MetricId) -> Option<&MetricDescriptor> {
        self.metrics.get(id.index())
    }

    /// Metric descriptors in registration order
    pub fn metrics(&self) -> impl Iterator<Item = (MetricId, &MetricDescriptor)> {
        self.metrics.iter().enumerate().map(|(i, m)| (MetricId(i), m))
    }

    pub fn set_int_value(&mut self, metric: MetricId, instance: InstanceId, value: i64) -> Result<(), MatrixError> {
        if instance.index() >= self.instances.len() {
            return Err(MatrixError::UnknownInstance(instance.index()));
        }

        let descriptor = self.metrics.get_mut(metric.index()).ok_or(MatrixError::UnknownMetric(metric.index()))?;
        descriptor.set_value(instance, value);
        Ok(())
    }

    /// Value of the metric registered as `metric_key` for the instance keyed `instance_key`
    #[must_use]
    pub fn value(&self, metric_key: &str, instance_key: &str) -> Option<i64> {
        let metric = self.metric_by_id(self.metric(metric_key)?)?;
        metric.value(self.instance(instance_key)?)
    }

    /// Clear all metric values, keeping instances, labels and descriptors.
    pub fn reset(&mut self) {
        for metric in &mut self.metrics {
            metric.reset();
        }
    }
}
