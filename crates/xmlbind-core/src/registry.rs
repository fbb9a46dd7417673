//! Element type descriptors and tag-to-type resolution.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::namespace::NamespaceMap;
use crate::BindError;

/// Descriptor for one element type, keyed by `(tag name, type namespace)`.
///
/// Registered on the parser before parsing and shared into every bound
/// element, so trees stay usable after the parser is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementType {
    /// Tag name this type binds to (case sensitive).
    pub tag: String,
    /// Logical grouping the type is registered under.
    pub type_namespace: String,
    /// Allowed attribute names; empty means unrestricted.
    pub attributes: Vec<String>,
    /// Declared child slots in declaration order.
    pub slots: Vec<String>,
}

impl ElementType {
    pub fn new(tag: impl Into<String>, type_namespace: impl Into<String>) -> Self {
        ElementType {
            tag: tag.into(),
            type_namespace: type_namespace.into(),
            attributes: Vec::new(),
            slots: Vec::new(),
        }
    }

    /// Declare the child slots of this type, in export order.
    pub fn with_slots(mut self, slots: &[&str]) -> Self {
        self.slots = slots.iter().map(|slot| slot.to_string()).collect();
        self
    }

    /// Restrict the attributes this type accepts.
    pub fn with_attributes(mut self, attributes: &[&str]) -> Self {
        self.attributes = attributes.iter().map(|attr| attr.to_string()).collect();
        self
    }

    /// Whether the allow-list admits an attribute name.
    pub fn allows_attribute(&self, name: &str) -> bool {
        self.attributes.is_empty() || self.attributes.iter().any(|attr| attr == name)
    }

    pub fn has_slot(&self, name: &str) -> bool {
        self.slots.iter().any(|slot| slot == name)
    }

    /// The generic type backing lenient-mode unknown tags: unrestricted
    /// attributes, no declared slots.
    fn generic() -> Self {
        ElementType::new("", "")
    }

    /// Whether this is the generic fallback rather than a registered type.
    pub fn is_generic(&self) -> bool {
        self.tag.is_empty()
    }
}

/// Static registry of element types, read-only during parsing.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: HashMap<(String, String), Arc<ElementType>>,
    generic: Arc<ElementType>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        TypeRegistry {
            types: HashMap::new(),
            generic: Arc::new(ElementType::generic()),
        }
    }

    pub fn register(&mut self, ty: ElementType) {
        let key = (ty.tag.clone(), ty.type_namespace.clone());
        self.types.insert(key, Arc::new(ty));
    }

    pub fn lookup(&self, tag: &str, type_namespace: &str) -> Option<Arc<ElementType>> {
        self.types
            .get(&(tag.to_string(), type_namespace.to_string()))
            .cloned()
    }

    pub fn generic(&self) -> Arc<ElementType> {
        Arc::clone(&self.generic)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A tag name resolved to its element type and namespace URI.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub ty: Arc<ElementType>,
    /// URI of the tag's declared namespace; `None` for unprefixed tags.
    pub namespace: Option<String>,
}

/// Per-parse view over the registry and the caller's namespace bindings.
pub struct TypeResolver<'a> {
    registry: &'a TypeRegistry,
    /// Namespace URI → type namespace.
    bindings: &'a HashMap<String, String>,
    /// Type namespace used for unprefixed tags.
    default_type_namespace: &'a str,
    strict: bool,
}

impl<'a> TypeResolver<'a> {
    pub fn new(
        registry: &'a TypeRegistry,
        bindings: &'a HashMap<String, String>,
        default_type_namespace: &'a str,
        strict: bool,
    ) -> Self {
        TypeResolver {
            registry,
            bindings,
            default_type_namespace,
            strict,
        }
    }

    /// Resolve a `(local name, prefix)` pair against the document's
    /// namespace map.
    ///
    /// An undeclared prefix or a declared namespace with no type-namespace
    /// binding is a hard failure in both modes. An unregistered tag fails
    /// only in strict mode; lenient mode falls back to the generic type.
    pub fn resolve(
        &self,
        local_name: &str,
        prefix: &str,
        namespaces: &NamespaceMap,
    ) -> Result<Resolved, BindError> {
        let namespace = if prefix.is_empty() {
            None
        } else {
            let uri = namespaces
                .resolve(prefix)
                .ok_or_else(|| BindError::UnknownNamespacePrefix(prefix.to_string()))?;
            Some(uri.to_string())
        };

        let type_namespace = match &namespace {
            Some(uri) => self
                .bindings
                .get(uri)
                .ok_or_else(|| BindError::NoTypeNamespace(uri.clone()))?
                .as_str(),
            None => self.default_type_namespace,
        };

        let ty = match self.registry.lookup(local_name, type_namespace) {
            Some(ty) => ty,
            None if self.strict => {
                return Err(BindError::NoElementType(local_name.to_string()));
            }
            None => {
                debug!(
                    tag = %local_name,
                    type_namespace = %type_namespace,
                    "no element type registered, binding to the generic type"
                );
                self.registry.generic()
            }
        };

        Ok(Resolved { ty, namespace })
    }
}
