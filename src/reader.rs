//! Pull-event wrapper over the `quick-xml` tokenizer.
//!
//! [`EventSource`] flattens quick-xml's event stream into the four event
//! kinds the decoder cares about (start tag, end tag, text, end of document)
//! and owns the traversal primitives: advance, advance-to-next-tag,
//! attribute lookup on the current start tag, and subtree skipping.
//!
//! Namespace processing is disabled by construction: this uses the plain
//! `Reader`, not `NsReader`, so `media:thumbnail` is just an unrecognized
//! tag name.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::DecodeError;

/// One event pulled from the document, carrying its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PullEvent {
    /// Opening tag, with its name. Attributes are available via
    /// [`EventSource::attribute`] while the cursor stays on this tag.
    StartTag(String),
    /// Closing tag, with its name.
    EndTag(String),
    /// Unescaped character data (including CDATA).
    Text(String),
    /// The input is exhausted.
    EndDocument,
}

/// What kind of event the cursor currently rests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    BeforeDocument,
    StartTag,
    EndTag,
    Text,
    EndDocument,
}

/// Forward-only cursor over one XML document.
///
/// Each decode call owns its own `EventSource`; there is no state shared
/// between documents. The reader never looks behind or re-reads.
pub(crate) struct EventSource<'xml> {
    reader: Reader<&'xml [u8]>,
    buf: Vec<u8>,
    cursor: Cursor,
    /// Attributes of the start tag the cursor is on, decoded and unescaped.
    attributes: Vec<(String, String)>,
    /// Synthetic end tag queued when a self-closing element is seen, so
    /// `<link/>` looks like `<link></link>` to everything downstream.
    pending_end: Option<String>,
}

impl<'xml> EventSource<'xml> {
    pub(crate) fn new(xml: &'xml str) -> Self {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);
        Self {
            reader,
            buf: Vec::new(),
            cursor: Cursor::BeforeDocument,
            attributes: Vec::new(),
            pending_end: None,
        }
    }

    /// Advances to the next pull event.
    ///
    /// Declarations, comments, processing instructions, and DOCTYPE are
    /// consumed silently. Whitespace-only text never surfaces (the reader
    /// trims text on both ends).
    pub(crate) fn next(&mut self) -> Result<PullEvent, DecodeError> {
        if let Some(name) = self.pending_end.take() {
            self.attributes.clear();
            self.cursor = Cursor::EndTag;
            return Ok(PullEvent::EndTag(name));
        }
        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf) {
                Ok(Event::Start(e)) => {
                    let name = tag_name(&e);
                    self.attributes = collect_attributes(&self.reader, &e)?;
                    self.cursor = Cursor::StartTag;
                    return Ok(PullEvent::StartTag(name));
                }
                Ok(Event::Empty(e)) => {
                    let name = tag_name(&e);
                    self.attributes = collect_attributes(&self.reader, &e)?;
                    self.pending_end = Some(name.clone());
                    self.cursor = Cursor::StartTag;
                    return Ok(PullEvent::StartTag(name));
                }
                Ok(Event::End(e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    self.attributes.clear();
                    self.cursor = Cursor::EndTag;
                    return Ok(PullEvent::EndTag(name));
                }
                Ok(Event::Text(e)) => {
                    let text = e
                        .unescape()
                        .map_err(|err| DecodeError::XmlParse(err.to_string()))?
                        .into_owned();
                    if text.is_empty() {
                        continue;
                    }
                    self.attributes.clear();
                    self.cursor = Cursor::Text;
                    return Ok(PullEvent::Text(text));
                }
                Ok(Event::CData(e)) => {
                    let bytes = e.into_inner();
                    let text = self
                        .reader
                        .decoder()
                        .decode(bytes.as_ref())
                        .map_err(|err| DecodeError::XmlParse(err.to_string()))?
                        .into_owned();
                    self.attributes.clear();
                    self.cursor = Cursor::Text;
                    return Ok(PullEvent::Text(text));
                }
                Ok(Event::Eof) => {
                    self.attributes.clear();
                    self.cursor = Cursor::EndDocument;
                    return Ok(PullEvent::EndDocument);
                }
                Ok(_) => continue,
                Err(e) => return Err(DecodeError::XmlParse(e.to_string())),
            }
        }
    }

    /// Advances past text events to the next tag boundary (or end of
    /// document).
    pub(crate) fn next_tag(&mut self) -> Result<PullEvent, DecodeError> {
        loop {
            match self.next()? {
                PullEvent::Text(_) => continue,
                event => return Ok(event),
            }
        }
    }

    /// Looks up an attribute by name on the start tag the cursor is on.
    ///
    /// Returns `None` when the cursor is not on a start tag or the attribute
    /// is absent.
    pub(crate) fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Consumes the element the cursor is on, including arbitrarily nested
    /// children, leaving the cursor on its matching end tag.
    ///
    /// Plain bracket matching over the tag stream: depth starts at 1,
    /// start tags increment, end tags decrement, done at 0. Iterative and
    /// O(1) space regardless of nesting.
    ///
    /// # Errors
    ///
    /// `MalformedDocument` if the cursor is not on a start tag, or if the
    /// document ends before the element closes.
    pub(crate) fn skip_subtree(&mut self) -> Result<(), DecodeError> {
        if self.cursor != Cursor::StartTag {
            return Err(DecodeError::MalformedDocument(
                "cannot skip: cursor is not on a start tag".into(),
            ));
        }
        let mut depth: usize = 1;
        while depth != 0 {
            match self.next()? {
                PullEvent::StartTag(_) => depth += 1,
                PullEvent::EndTag(_) => depth -= 1,
                PullEvent::Text(_) => {}
                PullEvent::EndDocument => {
                    return Err(DecodeError::MalformedDocument(
                        "document ended inside a skipped element".into(),
                    ))
                }
            }
        }
        Ok(())
    }
}

fn tag_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn collect_attributes(
    reader: &Reader<&[u8]>,
    e: &BytesStart<'_>,
) -> Result<Vec<(String, String)>, DecodeError> {
    let decoder = reader.decoder();
    let mut attributes = Vec::new();
    for attr_result in e.attributes() {
        let attr = match attr_result {
            Ok(attr) => attr,
            Err(err) => {
                tracing::warn!(error = %err, "skipping malformed attribute");
                continue;
            }
        };
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .decode_and_unescape_value(decoder)
            .map_err(|err| DecodeError::XmlParse(err.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(name: &str) -> PullEvent {
        PullEvent::StartTag(name.to_string())
    }

    fn end(name: &str) -> PullEvent {
        PullEvent::EndTag(name.to_string())
    }

    #[test]
    fn test_events_in_document_order() {
        let mut src = EventSource::new("<a><b>hi</b></a>");
        assert_eq!(src.next().unwrap(), start("a"));
        assert_eq!(src.next().unwrap(), start("b"));
        assert_eq!(src.next().unwrap(), PullEvent::Text("hi".to_string()));
        assert_eq!(src.next().unwrap(), end("b"));
        assert_eq!(src.next().unwrap(), end("a"));
        assert_eq!(src.next().unwrap(), PullEvent::EndDocument);
    }

    #[test]
    fn test_whitespace_between_elements_is_suppressed() {
        let mut src = EventSource::new("<a>\n  <b/>\n</a>");
        assert_eq!(src.next().unwrap(), start("a"));
        assert_eq!(src.next().unwrap(), start("b"));
        assert_eq!(src.next().unwrap(), end("b"));
        assert_eq!(src.next().unwrap(), end("a"));
    }

    #[test]
    fn test_self_closing_element_yields_start_then_end() {
        let mut src = EventSource::new(r#"<e url="u"/>"#);
        assert_eq!(src.next().unwrap(), start("e"));
        assert_eq!(src.attribute("url"), Some("u"));
        assert_eq!(src.next().unwrap(), end("e"));
        assert_eq!(src.next().unwrap(), PullEvent::EndDocument);
    }

    #[test]
    fn test_attribute_lookup_and_unescaping() {
        let mut src = EventSource::new(r#"<e a="x &amp; y" b=""/>"#);
        src.next().unwrap();
        assert_eq!(src.attribute("a"), Some("x & y"));
        assert_eq!(src.attribute("b"), Some(""));
        assert_eq!(src.attribute("missing"), None);
    }

    #[test]
    fn test_attributes_cleared_after_leaving_start_tag() {
        let mut src = EventSource::new(r#"<a k="v">text</a>"#);
        src.next().unwrap();
        assert_eq!(src.attribute("k"), Some("v"));
        src.next().unwrap(); // text
        assert_eq!(src.attribute("k"), None);
    }

    #[test]
    fn test_cdata_surfaces_as_text() {
        let mut src = EventSource::new("<a><![CDATA[<b> & raw]]></a>");
        src.next().unwrap();
        assert_eq!(
            src.next().unwrap(),
            PullEvent::Text("<b> & raw".to_string())
        );
    }

    #[test]
    fn test_next_tag_skips_text() {
        let mut src = EventSource::new("<a>some text</a>");
        assert_eq!(src.next_tag().unwrap(), start("a"));
        assert_eq!(src.next_tag().unwrap(), end("a"));
    }

    #[test]
    fn test_skip_leaves_cursor_on_matching_end_tag() {
        let mut src = EventSource::new("<a><junk><x><y>deep</y></x></junk><b>kept</b></a>");
        src.next().unwrap(); // <a>
        assert_eq!(src.next().unwrap(), start("junk"));
        src.skip_subtree().unwrap();
        // The enclosing loop's "read next" lands on the following sibling.
        assert_eq!(src.next().unwrap(), start("b"));
    }

    #[test]
    fn test_skip_handles_arbitrary_depth() {
        for depth in 1..40 {
            let mut xml = String::from("<root>");
            for _ in 0..depth {
                xml.push_str("<nest>");
            }
            xml.push_str("leaf");
            for _ in 0..depth {
                xml.push_str("</nest>");
            }
            xml.push_str("<after/></root>");

            let mut src = EventSource::new(&xml);
            src.next().unwrap(); // <root>
            src.next().unwrap(); // outermost <nest>
            src.skip_subtree()
                .unwrap_or_else(|e| panic!("skip failed at depth {}: {}", depth, e));
            assert_eq!(src.next().unwrap(), start("after"));
        }
    }

    #[test]
    fn test_skip_self_closing_element() {
        let mut src = EventSource::new("<a><junk/><b/></a>");
        src.next().unwrap();
        assert_eq!(src.next().unwrap(), start("junk"));
        src.skip_subtree().unwrap();
        assert_eq!(src.next().unwrap(), start("b"));
    }

    #[test]
    fn test_skip_requires_start_tag() {
        let mut src = EventSource::new("<a>text</a>");
        // Cursor still before the document.
        let err = src.skip_subtree().unwrap_err();
        assert!(matches!(err, DecodeError::MalformedDocument(_)));

        src.next().unwrap(); // <a>
        src.next().unwrap(); // text
        let err = src.skip_subtree().unwrap_err();
        assert!(matches!(err, DecodeError::MalformedDocument(_)));
    }

    #[test]
    fn test_skip_truncated_document_fails() {
        let mut src = EventSource::new("<a><junk><x>");
        src.next().unwrap();
        src.next().unwrap(); // <junk>
        assert!(src.skip_subtree().is_err());
    }
}
