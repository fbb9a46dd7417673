//! Namespace declarations: prefix→URI resolution and URI→prefix export maps.

/// Prefix→URI mapping built from the root tag's `xmlns` attributes.
///
/// Declaration order is preserved. The empty prefix holds a bare
/// `xmlns="uri"` default declaration. The map is immutable once built; a
/// prefix used by a tag but absent here is an undeclared-namespace error at
/// resolution time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceMap {
    entries: Vec<(String, String)>,
}

impl NamespaceMap {
    /// Split namespace declarations out of the root tag's attribute list.
    ///
    /// Returns the map plus the remaining (real) attributes, order
    /// preserved. URIs are not validated.
    pub fn from_root_attributes(
        attributes: Vec<(String, String)>,
    ) -> (Self, Vec<(String, String)>) {
        let mut entries = Vec::new();
        let mut rest = Vec::new();
        for (name, value) in attributes {
            if name == "xmlns" {
                entries.push((String::new(), value));
            } else if let Some(prefix) = name.strip_prefix("xmlns:") {
                entries.push((prefix.to_string(), value));
            } else {
                rest.push((name, value));
            }
        }
        (NamespaceMap { entries }, rest)
    }

    /// Look up the URI declared for a short prefix.
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(declared, _)| declared == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Declared `(prefix, uri)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(prefix, uri)| (prefix.as_str(), uri.as_str()))
    }
}

/// URI→prefix mapping supplied by the caller to [`Element::export`].
///
/// Entry order determines the order of `xmlns` declarations on the exported
/// root element.
///
/// [`Element::export`]: crate::Element::export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixMap {
    entries: Vec<(String, String)>,
}

impl PrefixMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the prefix to re-attach to elements of a namespace URI.
    ///
    /// An empty prefix exports as a default `xmlns="uri"` declaration.
    pub fn add(&mut self, uri: impl Into<String>, prefix: impl Into<String>) {
        self.entries.push((uri.into(), prefix.into()));
    }

    /// Look up the prefix for a namespace URI.
    pub fn prefix_for(&self, uri: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(declared, _)| declared == uri)
            .map(|(_, prefix)| prefix.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered `(uri, prefix)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(uri, prefix)| (uri.as_str(), prefix.as_str()))
    }
}
