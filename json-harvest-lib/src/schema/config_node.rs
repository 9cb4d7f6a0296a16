use serde_yaml::Value;

/// A generic configuration node: an optional name, optional scalar content and ordered children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigNode {
    pub name: Option<String>,
    pub content: Option<String>,
    pub children: Vec<Self>,
}

impl ConfigNode {
    #[must_use]
    pub fn named(name: impl Into<String>, children: Vec<Self>) -> Self {
        Self {
            name: Some(name.into()),
            content: None,
            children,
        }
    }

    #[must_use]
    pub fn leaf(content: impl Into<String>) -> Self {
        Self {
            name: None,
            content: Some(content.into()),
            children: Vec::new(),
        }
    }

    /// The string this node contributes to the schema: its name if non-empty, else its content.
    #[must_use]
    pub fn spec(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.content.as_deref().unwrap_or_default(),
        }
    }

    /// Convert a YAML value into a configuration node named `name`.
    ///
    /// Mapping entries become named children, sequence items become children (a single-entry
    /// mapping item is named by its key), and scalars become the node's content.
    #[must_use]
    pub fn from_yaml(name: Option<String>, value: &Value) -> Self {
        let mut node = Self {
            name,
            content: None,
            children: Vec::new(),
        };

        match value {
            Value::Null => {}
            Value::Sequence(items) => {
                node.children = items.iter().map(Self::from_yaml_item).collect();
            }
            Value::Mapping(entries) => {
                node.children = entries.iter().map(|(k, v)| Self::from_yaml(scalar_to_string(k), v)).collect();
            }
            Value::Tagged(tagged) => return Self::from_yaml(node.name, &tagged.value),
            scalar => node.content = scalar_to_string(scalar),
        }

        node
    }

    /// Convert one sequence item.
    #[must_use]
    pub fn from_yaml_item(item: &Value) -> Self {
        if let Value::Mapping(entries) = item
            && entries.len() == 1
            && let Some((k, v)) = entries.iter().next()
        {
            return Self::from_yaml(scalar_to_string(k), v);
        }

        Self::from_yaml(None, item)
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}
