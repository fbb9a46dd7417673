//! Stack-based assembly of tag events into a rooted element tree.

use tracing::debug;

use xmlbind_tokens::{TagEvent, TagKind};

use crate::element::Element;
use crate::namespace::NamespaceMap;
use crate::registry::TypeResolver;
use crate::BindError;

/// Assemble a fully tokenized document into its root element.
///
/// The first event is the document root; namespace declarations are read
/// from its attributes and fixed for the rest of the pass. Each open or
/// complete event resolves a type, and in strict mode must match a declared
/// slot on its parent. Exactly one top-level element is accepted.
pub fn build(
    events: Vec<TagEvent>,
    resolver: &TypeResolver<'_>,
    strict: bool,
) -> Result<Element, BindError> {
    let mut events = events.into_iter();
    let first = events
        .next()
        .ok_or_else(|| BindError::MalformedXml("document has no root element".to_string()))?;
    if first.kind == TagKind::Close {
        return Err(BindError::MalformedXml(format!(
            "unexpected closing tag </{}> before any element",
            first.raw_name
        )));
    }

    let (namespaces, root_attributes) = NamespaceMap::from_root_attributes(first.attributes);
    let (prefix, local) = xmlbind_tokens::split_raw_name(&first.raw_name);
    let resolved = resolver.resolve(local, prefix, &namespaces)?;
    let root = Element::new(
        local.to_string(),
        resolved.namespace,
        resolved.ty,
        root_attributes,
        first.text,
    );

    // Open elements paired with the slot name they will occupy on their
    // parent once closed; the root's slot name is never used.
    let mut stack: Vec<(Element, String)> = Vec::new();
    let mut done: Option<Element> = None;
    match first.kind {
        TagKind::Open => stack.push((root, String::new())),
        _ => done = Some(root),
    }

    for event in events {
        match event.kind {
            TagKind::Open | TagKind::Complete => {
                let Some((parent, _)) = stack.last_mut() else {
                    return Err(BindError::MalformedXml(format!(
                        "second top-level element <{}>",
                        event.raw_name
                    )));
                };
                let (prefix, local) = xmlbind_tokens::split_raw_name(&event.raw_name);
                let resolved = resolver.resolve(local, prefix, &namespaces)?;
                if strict && !parent.element_type().has_slot(local) {
                    return Err(BindError::NoSlot(
                        parent.element_type().tag.clone(),
                        local.to_string(),
                    ));
                }
                let element = Element::new(
                    local.to_string(),
                    resolved.namespace,
                    resolved.ty,
                    event.attributes,
                    event.text,
                );
                if event.kind == TagKind::Open {
                    stack.push((element, local.to_string()));
                } else {
                    parent.attach(local, element);
                }
            }
            TagKind::Close => {
                let Some((element, slot)) = stack.pop() else {
                    return Err(BindError::MalformedXml(format!(
                        "unexpected closing tag </{}>",
                        event.raw_name
                    )));
                };
                match stack.last_mut() {
                    Some((parent, _)) => parent.attach(&slot, element),
                    None => done = Some(element),
                }
            }
        }
    }

    if let Some((open, _)) = stack.last() {
        return Err(BindError::MalformedXml(format!(
            "document ended with <{}> still open",
            open.tag()
        )));
    }
    let Some(root) = done else {
        return Err(BindError::MalformedXml(
            "document has no root element".to_string(),
        ));
    };
    debug!(tag = %root.tag(), "bound document root");
    Ok(root)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::registry::{ElementType, TypeRegistry};

    fn lenient_build(xml: &str) -> Result<Element, BindError> {
        let registry = TypeRegistry::new();
        let bindings = HashMap::new();
        let resolver = TypeResolver::new(&registry, &bindings, "app", false);
        build(xmlbind_tokens::tokenize(xml)?, &resolver, false)
    }

    #[test]
    fn nested_document_builds_a_tree() {
        let root = lenient_build(
            r#"<root>
                <name type="full">John Arbuckle</name>
                <publications>
                    <publication>Book 1</publication>
                    <publication>Book 2</publication>
                </publications>
            </root>"#,
        )
        .expect("build");

        assert_eq!(root.tag(), "root");
        let name = root.slot("name").expect("name slot");
        assert_eq!(name.len(), 1);
        let name = name.as_one().expect("single name");
        assert_eq!(name.text(), "John Arbuckle");
        assert_eq!(name.get("type").expect("get"), Some("full"));

        let publications = root.slot("publications").expect("publications slot");
        let publications = publications.as_one().expect("single publications");
        let list = publications.slot("publication").expect("publication slot");
        assert!(list.as_one().is_none(), "repeated tag must upconvert");
        let texts: Vec<&str> = list.elements().iter().map(Element::text).collect();
        assert_eq!(texts, vec!["Book 1", "Book 2"]);
    }

    #[test]
    fn single_occurrence_stays_single() {
        let root = lenient_build("<root><only/></root>").expect("build");
        assert!(root.slot("only").unwrap().as_one().is_some());
    }

    #[test]
    fn self_closing_root_has_attributes_and_no_children() {
        let root = lenient_build(r#"<emptyRoot a="foo" b="bar"/>"#).expect("build");
        assert_eq!(root.get("a").expect("get"), Some("foo"));
        assert_eq!(root.get("b").expect("get"), Some("bar"));
        assert!(!root.has_children());
    }

    #[test]
    fn empty_document_is_malformed() {
        let err = lenient_build("  ").unwrap_err();
        assert!(matches!(err, BindError::MalformedXml(_)));
    }

    #[test]
    fn second_top_level_element_is_malformed() {
        let err = lenient_build("<a/><b/>").unwrap_err();
        assert!(matches!(err, BindError::MalformedXml(message)
            if message.contains("top-level")));
    }

    #[test]
    fn strict_mode_rejects_undeclared_slots() {
        let mut registry = TypeRegistry::new();
        registry.register(ElementType::new("order", "app"));
        registry.register(ElementType::new("comment", "app"));
        let bindings = HashMap::new();
        let resolver = TypeResolver::new(&registry, &bindings, "app", true);

        let events =
            xmlbind_tokens::tokenize("<order><comment>late</comment></order>").expect("tokenize");
        let err = build(events, &resolver, true).unwrap_err();
        assert!(matches!(err, BindError::NoSlot(parent, slot)
            if parent == "order" && slot == "comment"));
    }

    #[test]
    fn strict_mode_accepts_declared_slots() {
        let mut registry = TypeRegistry::new();
        registry.register(ElementType::new("order", "app").with_slots(&["comment"]));
        registry.register(ElementType::new("comment", "app"));
        let bindings = HashMap::new();
        let resolver = TypeResolver::new(&registry, &bindings, "app", true);

        let events =
            xmlbind_tokens::tokenize("<order><comment>on time</comment></order>").expect("tokenize");
        let root = build(events, &resolver, true).expect("build");
        assert_eq!(root.child("comment").unwrap().text(), "on time");
    }
}
