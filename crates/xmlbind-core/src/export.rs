//! Serialization of an element tree back to XML text.

use std::fmt::Write;

use crate::element::Element;
use crate::namespace::PrefixMap;

impl Element {
    /// Render this element and its subtree as an XML string.
    ///
    /// Prefixes are re-attached by looking each element's namespace URI up
    /// in `prefixes`; the root additionally carries one `xmlns` declaration
    /// per map entry, in map order. Declared slots export first, in
    /// declaration order, followed by undeclared slots in document order;
    /// a sequence-valued slot exports each occupant in order. Childless,
    /// textless elements self-close.
    ///
    /// Output is round-trip-stable: re-parsing it with the same parser
    /// configuration reproduces an equivalent tree, though formatting and
    /// declaration placement may differ from the original input.
    pub fn export(&self, prefixes: &PrefixMap) -> String {
        let mut out = String::new();
        self.write_subtree(&mut out, prefixes, true);
        out
    }

    fn write_subtree(&self, out: &mut String, prefixes: &PrefixMap, is_root: bool) {
        let name = self.qualified_name(prefixes);
        out.push('<');
        out.push_str(&name);
        if is_root {
            for (uri, prefix) in prefixes.iter() {
                if prefix.is_empty() {
                    let _ = write!(out, " xmlns=\"{}\"", escape_attribute(uri));
                } else {
                    let _ = write!(out, " xmlns:{}=\"{}\"", prefix, escape_attribute(uri));
                }
            }
        }
        for (attr, value) in self.attributes() {
            let _ = write!(out, " {}=\"{}\"", attr, escape_attribute(value));
        }

        if !self.has_children() && self.text().is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');

        for (_, value) in self.slots_in_export_order() {
            for child in value.elements() {
                child.write_subtree(out, prefixes, false);
            }
        }
        out.push_str(&escape_text(self.text()));

        out.push_str("</");
        out.push_str(&name);
        out.push('>');
    }

    fn qualified_name(&self, prefixes: &PrefixMap) -> String {
        let prefix = self
            .namespace()
            .and_then(|uri| prefixes.prefix_for(uri))
            .unwrap_or("");
        if prefix.is_empty() {
            self.tag().to_string()
        } else {
            format!("{}:{}", prefix, self.tag())
        }
    }

    /// Occupied slots, declared ones first in declaration order, then the
    /// rest in document order.
    fn slots_in_export_order(&self) -> Vec<(&str, &crate::element::SlotValue)> {
        let declared = &self.element_type().slots;
        let mut ordered = Vec::new();
        for slot in declared {
            if let Some(value) = self.slot(slot) {
                ordered.push((slot.as_str(), value));
            }
        }
        for (name, value) in self.slots() {
            if !declared.iter().any(|slot| slot == name) {
                ordered.push((name, value));
            }
        }
        ordered
    }
}

fn escape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attribute(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
