use super::InstanceId;

/// Handle to a metric within one matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetricId(pub(super) usize);

impl MetricId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A named metric and its value slot for every instance of the matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDescriptor {
    key: String,
    name: String,
    values: Vec<Option<i64>>,
}

impl MetricDescriptor {
    pub(super) fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            values: Vec::new(),
        }
    }

    /// The name the metric is looked up by (the schema field name)
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The name the metric is exported under
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self, instance: InstanceId) -> Option<i64> {
        self.values.get(instance.index()).copied().flatten()
    }

    pub(super) fn set_value(&mut self, instance: InstanceId, value: i64) {
        let index = instance.index();
        if self.values.len() <= index {
            self.values.resize(index + 1, None);
        }
        self.values[index] = Some(value);
    }

    pub(super) fn reset(&mut self) {
        self.values.clear();
    }
}
