//! Typed representation of a decoded RSS 2.0 channel.
//!
//! Every struct here is a plain record: public fields, no behavior. The
//! decoder accumulates into a mutable local value and hands it to the caller
//! only once the element's closing tag has been consumed, so a caller never
//! observes a partially built record.
//!
//! All scalar fields are optional: an absent element simply leaves its field
//! `None`. `categories` and `items` default to empty vectors and preserve
//! document order.

use serde::{Deserialize, Serialize};

use crate::parser::decode;
use crate::DecodeError;

/// A decoded RSS 2.0 `<channel>`.
///
/// Date fields (`pub_date`, `last_build_date`) are kept as the raw strings
/// from the feed; real-world feeds use too many date formats for strict
/// parsing to be the decoder's job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub language: Option<String>,
    pub copyright: Option<String>,
    pub managing_editor: Option<String>,
    pub web_master: Option<String>,
    pub pub_date: Option<String>,
    pub last_build_date: Option<String>,
    pub generator: Option<String>,
    pub docs: Option<String>,
    pub ttl: Option<i32>,
    pub rating: Option<f64>,
    pub skip_hours: Option<i32>,
    pub skip_days: Option<String>,
    pub image: Option<Image>,
    pub cloud: Option<Cloud>,
    pub text_input: Option<TextInput>,
    /// Channel-scope categories carry text only, in document order.
    pub categories: Vec<String>,
    /// Items in document order.
    pub items: Vec<Item>,
}

impl std::str::FromStr for Channel {
    type Err = DecodeError;

    /// Decodes an RSS document, so `xml.parse::<Channel>()` works.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

/// A single `<item>` within a channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub author: Option<String>,
    pub comments: Option<String>,
    pub source: Option<String>,
    pub guid: Option<String>,
    pub pub_date: Option<String>,
    pub enclosure: Option<Enclosure>,
    /// Item-scope categories are structured (name + optional domain),
    /// in document order.
    pub categories: Vec<Category>,
}

/// The channel's `<image>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub link: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
}

/// The channel's `<cloud>` registration endpoint. All fields come from
/// attributes, not child elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    pub domain: Option<String>,
    pub port: Option<i32>,
    pub path: Option<String>,
    pub register_procedure: Option<String>,
    pub protocol: Option<String>,
}

/// The channel's `<textInput>` box.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub name: Option<String>,
    pub link: Option<String>,
}

/// An item's `<enclosure>` (attached media). All fields come from attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Enclosure {
    pub url: Option<String>,
    /// Size in bytes. Feeds routinely lie about or omit this.
    pub length: Option<i64>,
    pub r#type: Option<String>,
}

/// An item-scope `<category>`: name from the element text, domain from the
/// `domain` attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: Option<String>,
    pub domain: Option<String>,
}
