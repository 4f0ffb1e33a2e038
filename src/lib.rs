//! Streaming RSS 2.0 decoder.
//!
//! Decodes an RSS 2.0 document into a typed [`Channel`] in a single
//! forward pass over the tokenizer's pull events. No document tree is ever
//! built, and elements the decoder does not recognize (vendor extensions,
//! namespaced modules) are skipped wholesale instead of failing the decode.
//!
//! # Architecture
//!
//! - [`decode`] / [`Channel`] - the public surface: text in, channel out
//! - `reader` - pull-event cursor over `quick-xml`, including the
//!   subtree-skip primitive
//! - `parser` - per-element decoders driven by a closed tag-dispatch enum
//! - `model` types - plain immutable records, `serde`-serializable
//!
//! Fetching feed bytes, caching results, and date parsing are deliberately
//! out of scope; the input is a fully materialized string and the output is
//! a value.
//!
//! # Example
//!
//! ```
//! let xml = r#"<rss version="2.0"><channel>
//!     <title>Example</title>
//!     <item><title>First post</title></item>
//! </channel></rss>"#;
//!
//! let channel = rsspull::decode(xml)?;
//! assert_eq!(channel.title.as_deref(), Some("Example"));
//! assert_eq!(channel.items.len(), 1);
//! # Ok::<(), rsspull::DecodeError>(())
//! ```
//!
//! Malformed optional numerics never abort a decode: `<ttl>soon</ttl>`
//! simply leaves `ttl` as `None`. Structural problems (mismatched end tags,
//! truncated documents, no `<channel>` at all) surface as [`DecodeError`].

mod error;
mod model;
mod parser;
mod reader;

pub use error::DecodeError;
pub use model::{Category, Channel, Cloud, Enclosure, Image, Item, TextInput};
pub use parser::decode;
