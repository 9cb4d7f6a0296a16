use super::{InstanceId, MatrixError, MetricId};

/// Abstract the metrics store that extraction writes into.
///
/// Every operation is addressed by schema root id; each root owns a disjoint set of
/// instances and metric descriptors.
pub trait Sink {
    /// Look up an instance by its composite key
    fn instance(&self, root: &str, key: &str) -> Option<InstanceId>;

    /// Create and register an instance; fails if the key is already taken
    fn new_instance(&mut self, root: &str, key: &str) -> Result<InstanceId, MatrixError>;

    /// Look up a metric descriptor by its declared name
    fn metric(&self, root: &str, name: &str) -> Option<MetricId>;

    /// Insert or overwrite a label on an instance
    fn set_label(&mut self, root: &str, instance: InstanceId, name: &str, value: &str) -> Result<(), MatrixError>;

    /// Write one value for an instance
    fn set_int_value(&mut self, root: &str, metric: MetricId, instance: InstanceId, value: i64) -> Result<(), MatrixError>;
}
