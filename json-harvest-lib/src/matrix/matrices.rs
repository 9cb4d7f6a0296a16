use super::{InstanceId, Matrix, MatrixError, MetricId, Sink};
use std::collections::BTreeMap;

/// One [`Matrix`] per schema root.
#[derive(Debug, Clone, Default)]
pub struct Matrices {
    by_root: BTreeMap<String, Matrix>,
}

impl Matrices {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the matrix for `root`, replacing any previous one
    pub fn insert(&mut self, root: impl Into<String>, matrix: Matrix) {
        let _ = self.by_root.insert(root.into(), matrix);
    }

    #[must_use]
    pub fn contains(&self, root: &str) -> bool {
        self.by_root.contains_key(root)
    }

    #[must_use]
    pub fn get(&self, root: &str) -> Option<&Matrix> {
        self.by_root.get(root)
    }

    pub fn get_mut(&mut self, root: &str) -> Option<&mut Matrix> {
        self.by_root.get_mut(root)
    }

    /// Matrices ordered by root id
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Matrix)> {
        self.by_root.iter().map(|(root, m)| (root.as_str(), m))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_root.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_root.is_empty()
    }

    fn require_mut(&mut self, root: &str) -> Result<&mut Matrix, MatrixError> {
        self.by_root.get_mut(root).ok_or_else(|| MatrixError::UnknownRoot(root.to_string()))
    }
}

impl Sink for Matrices {
    fn instance(&self, root: &str, key: &str) -> Option<InstanceId> {
        self.get(root)?.instance(key)
    }

    fn new_instance(&mut self, root: &str, key: &str) -> Result<InstanceId, MatrixError> {
        self.require_mut(root)?.new_instance(key)
    }

    fn metric(&self, root: &str, name: &str) -> Option<MetricId> {
        self.get(root)?.metric(name)
    }

    fn set_label(&mut self, root: &str, instance: InstanceId, name: &str, value: &str) -> Result<(), MatrixError> {
        self.require_mut(root)?.set_label(instance, name, value)
    }

    fn set_int_value(&mut self, root: &str, metric: MetricId, instance: InstanceId, value: i64) -> Result<(), MatrixError> {
        self.require_mut(root)?.set_int_value(metric, instance, value)
    }
}
