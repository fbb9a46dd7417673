//! The bound element: attributes, text, and named child slots.

use std::sync::Arc;

use crate::registry::ElementType;
use crate::BindError;

/// Contents of one child slot.
///
/// The tree builder upconverts automatically: the first occurrence of a tag
/// under a parent is stored as [`SlotValue::One`]; a repeat replaces it with
/// [`SlotValue::Many`] holding both, in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotValue {
    One(Element),
    Many(Vec<Element>),
}

impl SlotValue {
    /// The single occupant, if this slot was never upconverted.
    pub fn as_one(&self) -> Option<&Element> {
        match self {
            SlotValue::One(element) => Some(element),
            SlotValue::Many(_) => None,
        }
    }

    /// The occupants as a slice, whether one or many.
    pub fn elements(&self) -> &[Element] {
        match self {
            SlotValue::One(element) => std::slice::from_ref(element),
            SlotValue::Many(elements) => elements,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SlotValue::One(_) => 1,
            SlotValue::Many(elements) => elements.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, element: Element) {
        match std::mem::replace(self, SlotValue::Many(Vec::new())) {
            SlotValue::One(first) => *self = SlotValue::Many(vec![first, element]),
            SlotValue::Many(mut elements) => {
                elements.push(element);
                *self = SlotValue::Many(elements);
            }
        }
    }
}

/// One bound tag instance: a node of the typed tree.
///
/// Elements own their children exclusively; the tree has no back-pointers.
/// Attribute access goes through the type's allow-list; an empty allow-list
/// means unrestricted. Attributes arriving from the document are stored as
/// written, so reading an attribute the type forbids fails even when the
/// document supplied it.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    namespace: Option<String>,
    ty: Arc<ElementType>,
    attributes: Vec<(String, String)>,
    text: String,
    /// Child slots in first-seen document order.
    slots: Vec<(String, SlotValue)>,
}

impl Element {
    pub(crate) fn new(
        tag: String,
        namespace: Option<String>,
        ty: Arc<ElementType>,
        attributes: Vec<(String, String)>,
        text: String,
    ) -> Self {
        Element {
            tag,
            namespace,
            ty,
            attributes,
            text,
            slots: Vec::new(),
        }
    }

    /// Local tag name, prefix already stripped.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// URI of the namespace the tag was written in, if prefixed.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The descriptor this element was bound to.
    pub fn element_type(&self) -> &ElementType {
        &self.ty
    }

    /// The element's own text content (not a recursive dump).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Raw attribute list in document order, unchecked.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Read an attribute value, enforcing the type's allow-list.
    pub fn get(&self, name: &str) -> Result<Option<&str>, BindError> {
        self.check_attribute(name)?;
        Ok(self.find_attribute(name))
    }

    /// Insert or overwrite an attribute, enforcing the allow-list.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), BindError> {
        let name = name.into();
        self.check_attribute(&name)?;
        let value = value.into();
        match self.attributes.iter_mut().find(|(attr, _)| *attr == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
        Ok(())
    }

    /// Whether an attribute is present, enforcing the allow-list.
    pub fn has(&self, name: &str) -> Result<bool, BindError> {
        self.check_attribute(name)?;
        Ok(self.find_attribute(name).is_some())
    }

    /// Remove an attribute, enforcing the allow-list. Returns whether it
    /// was present.
    pub fn delete(&mut self, name: &str) -> Result<bool, BindError> {
        self.check_attribute(name)?;
        let before = self.attributes.len();
        self.attributes.retain(|(attr, _)| attr != name);
        Ok(self.attributes.len() != before)
    }

    /// Look up a child slot by name.
    pub fn slot(&self, name: &str) -> Option<&SlotValue> {
        self.slots
            .iter()
            .find(|(slot, _)| slot == name)
            .map(|(_, value)| value)
    }

    /// The first child in a slot, whether stored singly or as a sequence.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.slot(name).and_then(|value| value.elements().first())
    }

    /// All children in a slot; empty when the slot is unoccupied.
    pub fn children(&self, name: &str) -> &[Element] {
        self.slot(name).map(SlotValue::elements).unwrap_or(&[])
    }

    /// Occupied slots in first-seen document order.
    pub fn slots(&self) -> impl Iterator<Item = (&str, &SlotValue)> {
        self.slots
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn has_children(&self) -> bool {
        !self.slots.is_empty()
    }

    /// Store a child in a named slot, applying the upconversion rule.
    ///
    /// Declared and undeclared slots behave identically here; strict-mode
    /// slot checking happens in the tree builder before attachment.
    pub(crate) fn attach(&mut self, slot_name: &str, child: Element) {
        match self.slots.iter_mut().find(|(slot, _)| slot == slot_name) {
            Some((_, value)) => value.push(child),
            None => self
                .slots
                .push((slot_name.to_string(), SlotValue::One(child))),
        }
    }

    fn find_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.as_str())
    }

    fn check_attribute(&self, name: &str) -> Result<(), BindError> {
        if !self.ty.allows_attribute(name) {
            return Err(BindError::IllegalAttribute(
                name.to_string(),
                self.tag.clone(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generic(tag: &str) -> Element {
        Element::new(
            tag.to_string(),
            None,
            Arc::new(ElementType::new("", "")),
            Vec::new(),
            String::new(),
        )
    }

    fn restricted(tag: &str, allowed: &[&str]) -> Element {
        Element::new(
            tag.to_string(),
            None,
            Arc::new(ElementType::new(tag, "app").with_attributes(allowed)),
            Vec::new(),
            String::new(),
        )
    }

    #[test]
    fn attribute_roundtrip_without_allow_list() {
        let mut element = generic("free");
        element.set("anything", "goes").expect("set");
        assert_eq!(element.get("anything").expect("get"), Some("goes"));
        assert!(element.has("anything").expect("has"));
        assert!(element.delete("anything").expect("delete"));
        assert!(!element.has("anything").expect("has after delete"));
    }

    #[test]
    fn allow_list_rejects_reads_and_writes() {
        let mut element = restricted("order", &["date"]);
        element.set("date", "1999-10-20").expect("allowed set");

        let err = element.get("status").unwrap_err();
        assert!(matches!(err, BindError::IllegalAttribute(attr, tag)
            if attr == "status" && tag == "order"));
        assert!(element.set("status", "open").is_err());
        assert!(element.has("status").is_err());
        assert!(element.delete("status").is_err());
    }

    #[test]
    fn missing_allowed_attribute_reads_as_none() {
        let element = restricted("order", &["date"]);
        assert_eq!(element.get("date").expect("get"), None);
        assert!(!element.has("date").expect("has"));
    }

    #[test]
    fn set_overwrites_in_place() {
        let mut element = generic("e");
        element.set("a", "1").unwrap();
        element.set("b", "2").unwrap();
        element.set("a", "3").unwrap();
        assert_eq!(
            element.attributes(),
            &[
                ("a".to_string(), "3".to_string()),
                ("b".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn attach_upconverts_on_repeat() {
        let mut parent = generic("publications");
        parent.attach("publication", generic("publication"));
        assert_eq!(parent.slot("publication").unwrap().len(), 1);
        assert!(parent.slot("publication").unwrap().as_one().is_some());

        parent.attach("publication", generic("publication"));
        let slot = parent.slot("publication").unwrap();
        assert!(slot.as_one().is_none());
        assert_eq!(slot.len(), 2);

        parent.attach("publication", generic("publication"));
        assert_eq!(parent.slot("publication").unwrap().len(), 3);
    }

    #[test]
    fn slots_keep_first_seen_order() {
        let mut parent = generic("root");
        parent.attach("b", generic("b"));
        parent.attach("a", generic("a"));
        parent.attach("b", generic("b"));
        let names: Vec<&str> = parent.slots().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(parent.children("b").len(), 2);
        assert_eq!(parent.children("missing").len(), 0);
    }
}
