//! Flat tag event extraction over quick-xml.
//!
//! The tree builder in `xmlbind-core` does not consume pull events directly;
//! it works on an ordered [`Vec<TagEvent>`] materialized for the whole
//! document up front. Text nodes are folded into the nearest open tag, so a
//! tag event carries everything the builder needs: kind, raw name,
//! attributes, and text content.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;
use tracing::trace;

/// Error type produced by document tokenization.
#[derive(Debug, Error)]
pub enum TagError {
    /// quick-xml could not tokenize the input.
    #[error("xml: {0}")]
    Xml(String),
    /// Non-whitespace text appeared outside the root element.
    #[error("text content outside the root element")]
    TextOutsideRoot,
}

/// The shape of one tag token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `<tag ...>` with children or text to follow.
    Open,
    /// `</tag>`.
    Close,
    /// `<tag .../>`, opened and closed in one token.
    Complete,
}

/// One token from tokenizing raw XML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEvent {
    pub kind: TagKind,
    /// Tag name as written, possibly `prefix:local`.
    pub raw_name: String,
    /// Attributes in document order, values entity-unescaped.
    pub attributes: Vec<(String, String)>,
    /// Text content folded in from child text nodes, trimmed.
    pub text: String,
}

impl TagEvent {
    /// Split the raw tag name into `(prefix, local name)`.
    ///
    /// The prefix is empty for unprefixed tags.
    pub fn split_name(&self) -> (&str, &str) {
        split_raw_name(&self.raw_name)
    }
}

/// Split a raw `prefix:local` name; unprefixed names yield an empty prefix.
pub fn split_raw_name(raw: &str) -> (&str, &str) {
    match raw.split_once(':') {
        Some((prefix, local)) => (prefix, local),
        None => ("", raw),
    }
}

/// Tokenize a whole document into its ordered tag event sequence.
///
/// Comments, processing instructions, declarations, and DOCTYPEs are
/// ignored. Whitespace-only text is dropped; other text attaches to the
/// innermost open tag. Well-formedness violations (mismatched end tags,
/// broken attribute syntax) surface as [`TagError::Xml`].
pub fn tokenize(xml: &str) -> Result<Vec<TagEvent>, TagError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut events: Vec<TagEvent> = Vec::new();
    // Indices into `events` of the tags currently open, innermost last.
    let mut open: Vec<usize> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let event = tag_event(&e, TagKind::Open)?;
                open.push(events.len());
                events.push(event);
            }
            Ok(Event::Empty(e)) => {
                events.push(tag_event(&e, TagKind::Complete)?);
            }
            Ok(Event::End(e)) => {
                open.pop();
                events.push(TagEvent {
                    kind: TagKind::Close,
                    raw_name: String::from_utf8_lossy(e.name().as_ref()).to_string(),
                    attributes: Vec::new(),
                    text: String::new(),
                });
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(|err| TagError::Xml(err.to_string()))?;
                attach_text(&mut events, &open, text.trim())?;
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(e.as_ref()).to_string();
                attach_text(&mut events, &open, text.trim())?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(TagError::Xml(err.to_string())),
        }
        buf.clear();
    }

    trace!(events = events.len(), "tokenized document");
    Ok(events)
}

fn tag_event(e: &BytesStart<'_>, kind: TagKind) -> Result<TagEvent, TagError> {
    let raw_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| TagError::Xml(err.to_string()))?;
        let name = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr
            .unescape_value()
            .map_err(|err| TagError::Xml(err.to_string()))?
            .into_owned();
        attributes.push((name, value));
    }
    Ok(TagEvent {
        kind,
        raw_name,
        attributes,
        text: String::new(),
    })
}

fn attach_text(events: &mut [TagEvent], open: &[usize], text: &str) -> Result<(), TagError> {
    if text.is_empty() {
        return Ok(());
    }
    match open.last() {
        Some(&index) => {
            let slot = &mut events[index].text;
            if !slot.is_empty() {
                slot.push(' ');
            }
            slot.push_str(text);
            Ok(())
        }
        None => Err(TagError::TextOutsideRoot),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_sequence_with_text_and_attributes() {
        let events = tokenize(
            r#"<order date="1999-10-20">
                <comment>Hurry, my lawn is going wild</comment>
                <item part="872-AA"/>
            </order>"#,
        )
        .expect("tokenize");

        assert_eq!(events.len(), 5);
        assert_eq!(events[0].kind, TagKind::Open);
        assert_eq!(events[0].raw_name, "order");
        assert_eq!(
            events[0].attributes,
            vec![("date".to_string(), "1999-10-20".to_string())]
        );
        assert_eq!(events[1].kind, TagKind::Open);
        assert_eq!(events[1].text, "Hurry, my lawn is going wild");
        assert_eq!(events[2].kind, TagKind::Close);
        assert_eq!(events[3].kind, TagKind::Complete);
        assert_eq!(
            events[3].attributes,
            vec![("part".to_string(), "872-AA".to_string())]
        );
        assert_eq!(events[4].kind, TagKind::Close);
        assert_eq!(events[4].raw_name, "order");
    }

    #[test]
    fn text_attaches_to_innermost_open_tag() {
        let events = tokenize("<a>outer<b>inner</b></a>").expect("tokenize");
        assert_eq!(events[0].text, "outer");
        assert_eq!(events[1].text, "inner");
    }

    #[test]
    fn attribute_order_is_preserved() {
        let events = tokenize(r#"<e b="2" a="1" c="3"/>"#).expect("tokenize");
        let names: Vec<&str> = events[0]
            .attributes
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn entities_are_unescaped() {
        let events = tokenize(r#"<e note="a &amp; b">x &lt; y</e>"#).expect("tokenize");
        assert_eq!(events[0].attributes[0].1, "a & b");
        assert_eq!(events[0].text, "x < y");
    }

    #[test]
    fn prefixed_names_split() {
        let events = tokenize(r#"<t:root xmlns:t="urn:x"><t:a/></t:root>"#).expect("tokenize");
        assert_eq!(events[0].split_name(), ("t", "root"));
        assert_eq!(events[1].split_name(), ("t", "a"));
        assert_eq!(split_raw_name("plain"), ("", "plain"));
    }

    #[test]
    fn mismatched_end_tag_is_rejected() {
        let err = tokenize("<a><b></a></b>").unwrap_err();
        assert!(matches!(err, TagError::Xml(_)));
    }

    #[test]
    fn text_outside_root_is_rejected() {
        let err = tokenize("<a/>stray").unwrap_err();
        assert!(matches!(err, TagError::TextOutsideRoot));
    }

    #[test]
    fn prolog_and_comments_are_ignored() {
        let events = tokenize(
            "<?xml version=\"1.0\"?>\n<!-- note -->\n<root><!-- inner --></root>",
        )
        .expect("tokenize");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].raw_name, "root");
    }
}
