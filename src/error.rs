use thiserror::Error;

/// Errors that can abort a decode.
///
/// Structural errors unwind the whole call; there is no partial-channel
/// recovery. Lenient numeric coercion (e.g. `<ttl>abc</ttl>`) is *not* an
/// error; the field is simply left absent.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The document ended without a `<channel>` element among the root's
    /// children.
    #[error("no <channel> element found in the document")]
    MissingChannel,

    /// Structural mismatch: an end tag did not match the expected element,
    /// or the document ended mid-element.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// The XML tokenizer itself rejected the input.
    #[error("XML parse error: {0}")]
    XmlParse(String),
}
