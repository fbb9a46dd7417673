//! Ready-made parser for the W3C XML Schema vocabulary.
//!
//! Schema documents are ordinary XML, so binding one only needs the right
//! registrations: the XML Schema namespace bound to the `xsd` type
//! namespace, plus descriptors for the vocabulary subset this crate
//! understands. Code generation from a bound schema tree is a separate
//! concern and not provided here.

use crate::registry::ElementType;
use crate::Parser;

/// Namespace URI of W3C XML Schema documents.
pub const XML_SCHEMA_URI: &str = "http://www.w3.org/2001/XMLSchema";

/// Type namespace the schema vocabulary is registered under.
pub const XSD_TYPE_NAMESPACE: &str = "xsd";

/// Build a parser preconfigured for XML Schema documents.
///
/// Lenient by default so vocabulary this subset does not cover still binds
/// to generic elements; call [`Parser::set_strict`] to change that.
pub fn schema_parser() -> Parser {
    let mut parser = Parser::new(XSD_TYPE_NAMESPACE);
    parser.add_namespace(XML_SCHEMA_URI, XSD_TYPE_NAMESPACE);

    let ns = XSD_TYPE_NAMESPACE;
    parser.register(
        ElementType::new("schema", ns).with_slots(&[
            "annotation",
            "element",
            "complexType",
            "simpleType",
        ]),
    );
    parser.register(
        ElementType::new("element", ns)
            .with_attributes(&["name", "type", "minOccurs", "maxOccurs"]),
    );
    parser.register(
        ElementType::new("complexType", ns)
            .with_attributes(&["name"])
            .with_slots(&["sequence"]),
    );
    parser.register(
        ElementType::new("simpleType", ns)
            .with_attributes(&["name"])
            .with_slots(&["restriction"]),
    );
    parser.register(ElementType::new("sequence", ns).with_slots(&["element", "attribute"]));
    parser.register(ElementType::new("attribute", ns).with_attributes(&["name", "type", "fixed"]));
    parser.register(
        ElementType::new("restriction", ns)
            .with_attributes(&["base"])
            .with_slots(&["maxExclusive", "pattern"]),
    );
    parser.register(ElementType::new("pattern", ns).with_attributes(&["value"]));
    parser.register(ElementType::new("maxExclusive", ns).with_attributes(&["value"]));
    parser.register(ElementType::new("annotation", ns).with_slots(&["documentation"]));
    parser.register(ElementType::new("documentation", ns));

    parser
}
