//! Tag-to-type binding: XML documents bound to a tree of typed elements.
//!
//! A [`Parser`] carries a declarative tag→type mapping: element type
//! descriptors registered under logical type namespaces, plus a table
//! binding XML namespace URIs to those type namespaces. Parsing tokenizes
//! the whole document (via `xmlbind-tokens`), resolves every tag to a type,
//! and assembles the typed tree with the single-vs-repeated-child
//! upconversion rule. Lenient mode binds unknown tags to a generic
//! unrestricted element; strict mode rejects unknown tags and undeclared
//! child slots.
//!
//! ```rust
//! use xmlbind_core::{ElementType, Parser};
//!
//! let mut parser = Parser::new("app");
//! parser.register(ElementType::new("order", "app").with_attributes(&["date"]));
//!
//! let order = parser
//!     .parse(r#"<order date="1999-10-20"><comment>Hurry!</comment></order>"#)
//!     .unwrap();
//! assert_eq!(order.get("date").unwrap(), Some("1999-10-20"));
//! assert_eq!(order.child("comment").unwrap().text(), "Hurry!");
//! ```
//!
//! A configured parser is read-only during `parse`; sharing one across
//! threads is safe exactly because configuration never changes after setup.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

use xmlbind_tokens::TagError;

pub mod builder;
pub mod element;
pub mod export;
pub mod namespace;
pub mod registry;
pub mod schema;

pub use element::{Element, SlotValue};
pub use namespace::{NamespaceMap, PrefixMap};
pub use registry::{ElementType, TypeRegistry};

/// Error type produced by binding operations.
#[derive(Debug, Error)]
pub enum BindError {
    /// A tag uses a short namespace prefix never declared on the root.
    #[error("the short namespace {0} is not declared on the root element")]
    UnknownNamespacePrefix(String),
    /// A declared namespace URI has no type namespace registered for it.
    #[error("the XML namespace {0} has no corresponding type namespace registered")]
    NoTypeNamespace(String),
    /// Strict mode only: a tag has no registered element type.
    #[error("no element type registered for XML tag: {0}")]
    NoElementType(String),
    /// Strict mode only: a child tag has no declared slot on its parent.
    #[error("element type {0} has no slot named {1}")]
    NoSlot(String, String),
    /// An attribute outside a type's allow-list was read or written.
    #[error("the attribute {0} is not allowed on the element {1}")]
    IllegalAttribute(String, String),
    /// The input could not be tokenized, or is not a single-rooted document.
    #[error("malformed xml: {0}")]
    MalformedXml(String),
    /// `parse_file` was given a path that does not exist.
    #[error("file not found: {0}")]
    FileNotFound(String),
    /// `parse_file` failed reading an existing path.
    #[error("io: {0}")]
    Io(String),
}

impl From<TagError> for BindError {
    fn from(err: TagError) -> Self {
        BindError::MalformedXml(err.to_string())
    }
}

/// A configured binder: type registrations, namespace bindings, and mode.
///
/// All configuration happens before parsing; `parse` takes `&self` and
/// keeps no state between calls.
#[derive(Debug, Clone)]
pub struct Parser {
    default_type_namespace: String,
    /// Namespace URI → type namespace.
    bindings: HashMap<String, String>,
    strict: bool,
    registry: TypeRegistry,
}

impl Parser {
    /// Create a lenient parser whose unprefixed tags resolve in
    /// `default_type_namespace`.
    pub fn new(default_type_namespace: impl Into<String>) -> Self {
        Parser {
            default_type_namespace: default_type_namespace.into(),
            bindings: HashMap::new(),
            strict: false,
            registry: TypeRegistry::new(),
        }
    }

    /// Select strict (unknown tags and slots are errors) or lenient
    /// (generic fallback) resolution.
    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Bind an XML namespace URI to the type namespace its tags resolve in.
    ///
    /// Every namespace URI a document actually uses must be bound, in
    /// either mode.
    pub fn add_namespace(
        &mut self,
        uri: impl Into<String>,
        type_namespace: impl Into<String>,
    ) {
        self.bindings.insert(uri.into(), type_namespace.into());
    }

    /// Register one element type descriptor.
    pub fn register(&mut self, ty: ElementType) {
        self.registry.register(ty);
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Bind a document to its typed element tree.
    pub fn parse(&self, xml: &str) -> Result<Element, BindError> {
        let events = xmlbind_tokens::tokenize(xml)?;
        let resolver = registry::TypeResolver::new(
            &self.registry,
            &self.bindings,
            &self.default_type_namespace,
            self.strict,
        );
        builder::build(events, &resolver, self.strict)
    }

    /// Read a file and bind its contents.
    ///
    /// A missing file reports [`BindError::FileNotFound`]; any other read
    /// failure reports [`BindError::Io`].
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Element, BindError> {
        let path = path.as_ref();
        let xml = fs::read_to_string(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => BindError::FileNotFound(path.display().to_string()),
            _ => BindError::Io(err.to_string()),
        })?;
        self.parse(&xml)
    }
}
