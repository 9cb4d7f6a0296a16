use core::fmt::{Display, Formatter};

const KEY_PREFIX: &str = "^^";
const LABEL_PREFIX: &str = "^";
const ALIAS_SEPARATOR: &str = "=>";

/// What an element does with the JSON field it names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// A label whose value also contributes a segment to the instance key
    KeyLabel,

    /// A descriptive label attached to the instance
    Label,

    /// A numeric measurement
    Metric,

    /// A collection of objects to descend into
    Nested {
        children: Vec<Element>,

        /// Whether at least one direct child is a key element
        has_nested_keys: bool,
    },
}

/// One node of a schema tree, describing how to interpret one JSON field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    display_name: String,
    kind: ElementKind,
}

impl Element {
    /// Turn a leaf element into a nested one holding `children`.
    ///
    /// Whatever kind the element was parsed with is replaced: an element with
    /// children only ever names a collection.
    #[must_use]
    pub fn with_children(self, children: Vec<Self>) -> Self {
        let has_nested_keys = children.iter().any(Self::is_key);
        Self {
            kind: ElementKind::Nested { children, has_nested_keys },
            ..self
        }
    }

    /// Field name read from the JSON payload
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Externally visible name, used as label key or metric name
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub const fn kind(&self) -> &ElementKind {
        &self.kind
    }

    #[must_use]
    pub const fn is_key(&self) -> bool {
        matches!(self.kind, ElementKind::KeyLabel)
    }

    #[must_use]
    pub const fn is_label(&self) -> bool {
        matches!(self.kind, ElementKind::KeyLabel | ElementKind::Label)
    }

    #[must_use]
    pub const fn is_metric(&self) -> bool {
        matches!(self.kind, ElementKind::Metric)
    }

    #[must_use]
    pub const fn is_nested(&self) -> bool {
        matches!(self.kind, ElementKind::Nested { .. })
    }

    #[must_use]
    pub const fn has_nested_keys(&self) -> bool {
        matches!(self.kind, ElementKind::Nested { has_nested_keys: true, .. })
    }

    /// Direct children, empty for leaf elements
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match &self.kind {
            ElementKind::Nested { children, .. } => children,
            _ => &[],
        }
    }

    /// The first direct child naming a nested collection, if any.
    ///
    /// Extraction only ever descends into this child; later nested siblings are not visited.
    #[must_use]
    pub fn first_nested_child(&self) -> Option<&Self> {
        self.children().iter().find(|c| c.is_nested())
    }

    /// Number of direct children naming nested collections
    #[must_use]
    pub fn nested_child_count(&self) -> usize {
        self.children().iter().filter(|c| c.is_nested()).count()
    }

    /// All metric elements in this subtree, depth-first in declaration order
    #[must_use]
    pub fn metric_elements(&self) -> Vec<&Self> {
        let mut metrics = Vec::new();
        self.collect_metrics(&mut metrics);
        metrics
    }

    fn collect_metrics<'a>(&'a self, out: &mut Vec<&'a Self>) {
        if self.is_metric() {
            out.push(self);
        }

        for child in self.children() {
            child.collect_metrics(out);
        }
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} ({}) key={} label={} metric={} nested={}",
            self.name,
            self.display_name,
            self.is_key(),
            self.is_label(),
            self.is_metric(),
            self.is_nested()
        )
    }
}

/// Parse a single element specification such as `^^name => repo`.
///
/// A `^^` prefix marks a key label, `^` a plain label, anything else a metric.
/// The remainder is `name` optionally followed by `=> display_name`. Parsing never fails.
#[must_use]
pub fn parse_element_spec(spec: &str) -> Element {
    let (kind, body) = if let Some(rest) = spec.strip_prefix(KEY_PREFIX) {
        (ElementKind::KeyLabel, rest)
    } else if let Some(rest) = spec.strip_prefix(LABEL_PREFIX) {
        (ElementKind::Label, rest)
    } else {
        (ElementKind::Metric, spec)
    };

    let parts: Vec<&str> = body.split(ALIAS_SEPARATOR).collect();
    let (name, display_name) = match parts.as_slice() {
        [name, display_name] => (name.trim(), display_name.trim()),
        _ => (body.trim(), body.trim()),
    };

    Element {
        name: name.to_string(),
        display_name: display_name.to_string(),
        kind,
    }
}
