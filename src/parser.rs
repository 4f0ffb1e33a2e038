//! RSS 2.0 element decoders.
//!
//! Control flow is a single forward pass: [`decode`] finds the `<channel>`
//! element among the document root's children, then [`read_channel`] walks
//! its children, dispatching each start tag through the closed [`Tag`] enum
//! to a scalar reader, a sub-element decoder, or the item decoder. Anything
//! unrecognized (vendor extensions, namespaced modules, future RSS
//! elements) is skipped wholesale, which is what keeps the decoder
//! forward-compatible.
//!
//! Tag names are exact, case-sensitive RSS 2.0 literals. There is no alias
//! or case-insensitive matching.

use crate::error::DecodeError;
use crate::model::{Category, Channel, Cloud, Enclosure, Image, Item, TextInput};
use crate::reader::{EventSource, PullEvent};

/// RSS 2.0 element and attribute names.
mod tag {
    pub(super) const CHANNEL: &str = "channel";
    pub(super) const ITEM: &str = "item";
    pub(super) const TITLE: &str = "title";
    pub(super) const DESCRIPTION: &str = "description";
    pub(super) const LINK: &str = "link";
    pub(super) const IMAGE: &str = "image";
    pub(super) const LANGUAGE: &str = "language";
    pub(super) const CATEGORY: &str = "category";
    pub(super) const COPYRIGHT: &str = "copyright";
    pub(super) const MANAGING_EDITOR: &str = "managingEditor";
    pub(super) const WEB_MASTER: &str = "webMaster";
    pub(super) const PUB_DATE: &str = "pubDate";
    pub(super) const LAST_BUILD_DATE: &str = "lastBuildDate";
    pub(super) const GENERATOR: &str = "generator";
    pub(super) const DOCS: &str = "docs";
    pub(super) const CLOUD: &str = "cloud";
    pub(super) const TTL: &str = "ttl";
    pub(super) const RATING: &str = "rating";
    pub(super) const TEXT_INPUT: &str = "textInput";
    pub(super) const SKIP_HOURS: &str = "skipHours";
    pub(super) const SKIP_DAYS: &str = "skipDays";
    pub(super) const ENCLOSURE: &str = "enclosure";
    pub(super) const GUID: &str = "guid";
    pub(super) const AUTHOR: &str = "author";
    pub(super) const COMMENTS: &str = "comments";
    pub(super) const SOURCE: &str = "source";
    pub(super) const URL: &str = "url";
    pub(super) const NAME: &str = "name";
    pub(super) const DOMAIN: &str = "domain";
    pub(super) const PORT: &str = "port";
    pub(super) const PATH: &str = "path";
    pub(super) const REGISTER_PROCEDURE: &str = "registerProcedure";
    pub(super) const PROTOCOL: &str = "protocol";
    pub(super) const LENGTH: &str = "length";
    pub(super) const TYPE: &str = "type";
}

/// Closed dispatch over the element names the decoder understands.
///
/// Every scope (channel, item, image, textInput) matches the variants it
/// cares about and sends the rest, including `Unknown`, to the subtree
/// skip, so e.g. an `<image>` inside an `<item>` is ignored rather than
/// misparsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Title,
    Description,
    Link,
    Language,
    Copyright,
    ManagingEditor,
    WebMaster,
    PubDate,
    LastBuildDate,
    Generator,
    Docs,
    Ttl,
    Rating,
    SkipHours,
    SkipDays,
    Category,
    Image,
    Cloud,
    TextInput,
    Item,
    Enclosure,
    Guid,
    Author,
    Comments,
    Source,
    Url,
    Name,
    Unknown,
}

impl Tag {
    fn from_name(name: &str) -> Tag {
        match name {
            tag::TITLE => Tag::Title,
            tag::DESCRIPTION => Tag::Description,
            tag::LINK => Tag::Link,
            tag::LANGUAGE => Tag::Language,
            tag::COPYRIGHT => Tag::Copyright,
            tag::MANAGING_EDITOR => Tag::ManagingEditor,
            tag::WEB_MASTER => Tag::WebMaster,
            tag::PUB_DATE => Tag::PubDate,
            tag::LAST_BUILD_DATE => Tag::LastBuildDate,
            tag::GENERATOR => Tag::Generator,
            tag::DOCS => Tag::Docs,
            tag::TTL => Tag::Ttl,
            tag::RATING => Tag::Rating,
            tag::SKIP_HOURS => Tag::SkipHours,
            tag::SKIP_DAYS => Tag::SkipDays,
            tag::CATEGORY => Tag::Category,
            tag::IMAGE => Tag::Image,
            tag::CLOUD => Tag::Cloud,
            tag::TEXT_INPUT => Tag::TextInput,
            tag::ITEM => Tag::Item,
            tag::ENCLOSURE => Tag::Enclosure,
            tag::GUID => Tag::Guid,
            tag::AUTHOR => Tag::Author,
            tag::COMMENTS => Tag::Comments,
            tag::SOURCE => Tag::Source,
            tag::URL => Tag::Url,
            tag::NAME => Tag::Name,
            _ => Tag::Unknown,
        }
    }
}

/// Decodes an RSS 2.0 document into a [`Channel`].
///
/// A single forward pass: moves to the document root, scans its children for
/// `<channel>`, and decodes it. Root-level siblings that are not `<channel>`
/// are skipped wholesale. Each call builds its own tokenizer, so independent
/// documents can be decoded from independent threads with no coordination.
///
/// # Errors
///
/// - [`DecodeError::MissingChannel`] if the document ends (or the root
///   element closes) without a `<channel>` child. Empty input falls under
///   this case.
/// - [`DecodeError::MalformedDocument`] on structural mismatch or a
///   document truncated mid-element.
/// - [`DecodeError::XmlParse`] if the tokenizer rejects the input.
pub fn decode(xml: &str) -> Result<Channel, DecodeError> {
    let mut source = EventSource::new(xml);

    // Move onto the document root element.
    if source.next_tag()? == PullEvent::EndDocument {
        return Err(DecodeError::MissingChannel);
    }

    loop {
        match source.next()? {
            PullEvent::StartTag(name) if name == tag::CHANNEL => {
                return read_channel(&mut source)
            }
            PullEvent::StartTag(name) => skip_unrecognized(&mut source, &name)?,
            PullEvent::EndTag(_) | PullEvent::EndDocument => {
                return Err(DecodeError::MissingChannel)
            }
            PullEvent::Text(_) => {}
        }
    }
}

/// Decodes the body of `<channel>`; the cursor is on its start tag.
fn read_channel(source: &mut EventSource<'_>) -> Result<Channel, DecodeError> {
    let mut channel = Channel::default();
    loop {
        match source.next()? {
            PullEvent::StartTag(name) => match Tag::from_name(&name) {
                Tag::Title => channel.title = read_string(source, tag::TITLE)?,
                Tag::Description => {
                    channel.description = read_string(source, tag::DESCRIPTION)?
                }
                Tag::Link => channel.link = read_string(source, tag::LINK)?,
                Tag::Language => channel.language = read_string(source, tag::LANGUAGE)?,
                Tag::Copyright => channel.copyright = read_string(source, tag::COPYRIGHT)?,
                Tag::ManagingEditor => {
                    channel.managing_editor = read_string(source, tag::MANAGING_EDITOR)?
                }
                Tag::WebMaster => channel.web_master = read_string(source, tag::WEB_MASTER)?,
                Tag::PubDate => channel.pub_date = read_string(source, tag::PUB_DATE)?,
                Tag::LastBuildDate => {
                    channel.last_build_date = read_string(source, tag::LAST_BUILD_DATE)?
                }
                Tag::Generator => channel.generator = read_string(source, tag::GENERATOR)?,
                Tag::Docs => channel.docs = read_string(source, tag::DOCS)?,
                Tag::Ttl => {
                    channel.ttl = parse_number(read_string(source, tag::TTL)?.as_deref(), tag::TTL)
                }
                Tag::Rating => {
                    channel.rating =
                        parse_number(read_string(source, tag::RATING)?.as_deref(), tag::RATING)
                }
                Tag::SkipHours => {
                    channel.skip_hours =
                        parse_number(read_string(source, tag::SKIP_HOURS)?.as_deref(), tag::SKIP_HOURS)
                }
                Tag::SkipDays => channel.skip_days = read_string(source, tag::SKIP_DAYS)?,
                // Channel-scope category carries text only.
                Tag::Category => {
                    if let Some(category) = read_string(source, tag::CATEGORY)? {
                        channel.categories.push(category);
                    }
                }
                Tag::Image => channel.image = Some(read_image(source)?),
                Tag::Cloud => channel.cloud = Some(read_cloud(source)?),
                Tag::TextInput => channel.text_input = Some(read_text_input(source)?),
                Tag::Item => channel.items.push(read_item(source)?),
                _ => skip_unrecognized(source, &name)?,
            },
            PullEvent::EndTag(name) => {
                expect_end(&name, tag::CHANNEL)?;
                break;
            }
            PullEvent::EndDocument => return Err(truncated(tag::CHANNEL)),
            PullEvent::Text(_) => {}
        }
    }
    Ok(channel)
}

/// Decodes one `<item>`; the cursor is on its start tag.
fn read_item(source: &mut EventSource<'_>) -> Result<Item, DecodeError> {
    let mut item = Item::default();
    loop {
        match source.next()? {
            PullEvent::StartTag(name) => match Tag::from_name(&name) {
                Tag::Title => item.title = read_string(source, tag::TITLE)?,
                Tag::Enclosure => item.enclosure = Some(read_enclosure(source)?),
                Tag::Guid => item.guid = read_string(source, tag::GUID)?,
                Tag::PubDate => item.pub_date = read_string(source, tag::PUB_DATE)?,
                Tag::Description => item.description = read_string(source, tag::DESCRIPTION)?,
                Tag::Link => item.link = read_string(source, tag::LINK)?,
                Tag::Author => item.author = read_string(source, tag::AUTHOR)?,
                // Item-scope category is structured, unlike channel scope.
                Tag::Category => item.categories.push(read_item_category(source)?),
                Tag::Comments => item.comments = read_string(source, tag::COMMENTS)?,
                Tag::Source => item.source = read_string(source, tag::SOURCE)?,
                _ => skip_unrecognized(source, &name)?,
            },
            PullEvent::EndTag(name) => {
                expect_end(&name, tag::ITEM)?;
                break;
            }
            PullEvent::EndDocument => return Err(truncated(tag::ITEM)),
            PullEvent::Text(_) => {}
        }
    }
    Ok(item)
}

fn read_image(source: &mut EventSource<'_>) -> Result<Image, DecodeError> {
    let mut image = Image::default();
    loop {
        match source.next()? {
            PullEvent::StartTag(name) => match Tag::from_name(&name) {
                Tag::Link => image.link = read_string(source, tag::LINK)?,
                Tag::Title => image.title = read_string(source, tag::TITLE)?,
                Tag::Url => image.url = read_string(source, tag::URL)?,
                _ => skip_unrecognized(source, &name)?,
            },
            PullEvent::EndTag(name) => {
                expect_end(&name, tag::IMAGE)?;
                break;
            }
            PullEvent::EndDocument => return Err(truncated(tag::IMAGE)),
            PullEvent::Text(_) => {}
        }
    }
    Ok(image)
}

fn read_text_input(source: &mut EventSource<'_>) -> Result<TextInput, DecodeError> {
    let mut text_input = TextInput::default();
    loop {
        match source.next()? {
            PullEvent::StartTag(name) => match Tag::from_name(&name) {
                Tag::Title => text_input.title = read_string(source, tag::TITLE)?,
                Tag::Description => text_input.description = read_string(source, tag::DESCRIPTION)?,
                Tag::Name => text_input.name = read_string(source, tag::NAME)?,
                Tag::Link => text_input.link = read_string(source, tag::LINK)?,
                _ => skip_unrecognized(source, &name)?,
            },
            PullEvent::EndTag(name) => {
                expect_end(&name, tag::TEXT_INPUT)?;
                break;
            }
            PullEvent::EndDocument => return Err(truncated(tag::TEXT_INPUT)),
            PullEvent::Text(_) => {}
        }
    }
    Ok(text_input)
}

/// Decodes `<cloud>`, whose fields live in attributes, not child elements.
fn read_cloud(source: &mut EventSource<'_>) -> Result<Cloud, DecodeError> {
    let mut cloud = Cloud::default();
    read_attributes(
        source,
        tag::CLOUD,
        &[
            tag::DOMAIN,
            tag::PORT,
            tag::PATH,
            tag::REGISTER_PROCEDURE,
            tag::PROTOCOL,
        ],
        |name, value| match name {
            tag::DOMAIN => cloud.domain = value.map(str::to_owned),
            tag::PORT => cloud.port = parse_number(value, tag::PORT),
            tag::PATH => cloud.path = value.map(str::to_owned),
            tag::REGISTER_PROCEDURE => cloud.register_procedure = value.map(str::to_owned),
            tag::PROTOCOL => cloud.protocol = value.map(str::to_owned),
            _ => {}
        },
    )?;
    Ok(cloud)
}

/// Decodes `<enclosure>`, an attribute-only element.
fn read_enclosure(source: &mut EventSource<'_>) -> Result<Enclosure, DecodeError> {
    let mut enclosure = Enclosure::default();
    read_attributes(
        source,
        tag::ENCLOSURE,
        &[tag::URL, tag::LENGTH, tag::TYPE],
        |name, value| match name {
            tag::URL => enclosure.url = value.map(str::to_owned),
            tag::LENGTH => enclosure.length = parse_number(value, tag::LENGTH),
            tag::TYPE => enclosure.r#type = value.map(str::to_owned),
            _ => {}
        },
    )?;
    Ok(enclosure)
}

/// Decodes an item-scope `<category>`: domain attribute plus text content.
fn read_item_category(source: &mut EventSource<'_>) -> Result<Category, DecodeError> {
    // The attribute must be captured before the cursor leaves the start tag.
    let domain = source.attribute(tag::DOMAIN).map(str::to_owned);
    let name = read_string(source, tag::CATEGORY)?;
    Ok(Category { name, domain })
}

/// Reads the text content of the element the cursor is on and leaves the
/// cursor on its end tag.
///
/// Empty and self-closing elements yield `None`. A child element where text
/// was expected (interleaved or overlapping tags) is a structural error.
fn read_string(
    source: &mut EventSource<'_>,
    tag_name: &str,
) -> Result<Option<String>, DecodeError> {
    let (content, event) = match source.next()? {
        PullEvent::Text(text) => (Some(text), source.next_tag()?),
        event => (None, event),
    };
    match event {
        PullEvent::EndTag(name) if name == tag_name => Ok(content),
        other => Err(unexpected_in(tag_name, &other)),
    }
}

/// Visits the requested attributes of the (childless) element the cursor is
/// on, then advances past it and verifies the end tag.
fn read_attributes<F>(
    source: &mut EventSource<'_>,
    tag_name: &str,
    names: &[&str],
    mut action: F,
) -> Result<(), DecodeError>
where
    F: FnMut(&str, Option<&str>),
{
    for &name in names {
        action(name, source.attribute(name));
    }
    match source.next_tag()? {
        PullEvent::EndTag(name) if name == tag_name => Ok(()),
        other => Err(unexpected_in(tag_name, &other)),
    }
}

/// Lenient numeric coercion. Feeds in the wild routinely carry malformed
/// numbers in optional fields; a bad value leaves the field absent rather
/// than failing the decode.
fn parse_number<T: std::str::FromStr>(text: Option<&str>, field: &str) -> Option<T> {
    let text = text?;
    match text.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::debug!(field, value = %text, "ignoring non-numeric value");
            None
        }
    }
}

fn skip_unrecognized(source: &mut EventSource<'_>, name: &str) -> Result<(), DecodeError> {
    tracing::trace!(element = %name, "skipping unrecognized element");
    source.skip_subtree()
}

fn expect_end(found: &str, expected: &str) -> Result<(), DecodeError> {
    if found == expected {
        Ok(())
    } else {
        Err(DecodeError::MalformedDocument(format!(
            "expected </{expected}>, found </{found}>"
        )))
    }
}

fn unexpected_in(element: &str, event: &PullEvent) -> DecodeError {
    let found = match event {
        PullEvent::StartTag(name) => format!("<{name}>"),
        PullEvent::EndTag(name) => format!("</{name}>"),
        PullEvent::Text(_) => "text content".to_string(),
        PullEvent::EndDocument => "end of document".to_string(),
    };
    DecodeError::MalformedDocument(format!("expected </{element}>, found {found}"))
}

fn truncated(element: &str) -> DecodeError {
    DecodeError::MalformedDocument(format!("document ended inside <{element}>"))
}
