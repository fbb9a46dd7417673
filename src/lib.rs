//! Facade over the xmlbind workspace crates: bind XML documents to typed
//! element trees and serialize them back to XML.
//!
//! ```rust
//! use xmlbind::{ElementType, Parser, PrefixMap};
//!
//! # fn main() -> Result<(), xmlbind::BindError> {
//! let mut parser = Parser::new("app");
//! parser.register(ElementType::new("note", "app").with_attributes(&["lang"]));
//!
//! let note = parser.parse(r#"<note lang="en"><body>Call home</body></note>"#)?;
//! assert_eq!(note.get("lang")?, Some("en"));
//! assert_eq!(note.child("body").map(|body| body.text()), Some("Call home"));
//!
//! let xml = note.export(&PrefixMap::new());
//! assert!(xml.contains("<body>Call home</body>"));
//! # Ok(())
//! # }
//! ```

pub use xmlbind_tokens as tokens;

pub use xmlbind_core::{
    schema, BindError, Element, ElementType, NamespaceMap, Parser, PrefixMap, SlotValue,
    TypeRegistry,
};
