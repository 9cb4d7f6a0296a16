use std::collections::BTreeMap;

/// Handle to an instance within one matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub(super) usize);

impl InstanceId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A uniquely keyed entity carrying labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    key: String,
    labels: BTreeMap<String, String>,
}

impl Instance {
    pub(super) fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            labels: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    #[must_use]
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels.get(name).map(String::as_str)
    }

    /// Insert or overwrite a label
    pub fn set_label(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let _ = self.labels.insert(name.into(), value.into());
    }
}
