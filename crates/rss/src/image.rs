// ABOUTME: Image and TextInput entities, both read from a flattened tag-to-text map.
// ABOUTME: Image width/height default to 88x31 and must not be negative.

use std::collections::BTreeMap;

use serde::Serialize;
use url::Url;

use crate::builder::{read_flat_map, ElementBuilder};
use crate::cursor::{Cursor, StartTag};
use crate::decode;
use crate::error::{Result, RssError};

pub const DEFAULT_IMAGE_WIDTH: u32 = 88;
pub const DEFAULT_IMAGE_HEIGHT: u32 = 31;

/// The channel's logo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    url: Url,
    title: String,
    link: Url,
    description: Option<String>,
    width: u32,
    height: u32,
}

impl Image {
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Alt text; the RSS tag is `<title>`.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn link(&self) -> &Url {
        &self.link
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// A search box the channel offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextInput {
    title: String,
    description: String,
    name: String,
    link: Url,
}

impl TextInput {
    /// Label of the submit button.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Name of the text object in the form.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The CGI script that processes the request.
    pub fn link(&self) -> &Url {
        &self.link
    }
}

fn required(
    fields: &mut BTreeMap<String, String>,
    entity: &'static str,
    tag: &str,
) -> Result<String> {
    fields
        .remove(tag)
        .ok_or_else(|| RssError::missing_field(entity, tag))
}

fn dimension(fields: &mut BTreeMap<String, String>, tag: &str, default: u32) -> Result<u32> {
    let Some(text) = fields.remove(tag).filter(|t| !t.is_empty()) else {
        return Ok(default);
    };
    let value = decode::integer(&format!("image/{tag}"), &text)?;
    u32::try_from(value)
        .map_err(|_| RssError::invariant("image", format!("{tag} must not be negative, got {value}")))
}

#[derive(Debug, Default)]
pub(crate) struct ImageBuilder {
    fields: BTreeMap<String, String>,
}

impl ElementBuilder for ImageBuilder {
    type Output = Image;
    const ELEMENT: &'static str = "image";

    fn consume(&mut self, cursor: &mut Cursor<'_>, start: &StartTag) -> Result<()> {
        self.fields = read_flat_map(cursor, start, Self::ELEMENT)?;
        Ok(())
    }

    fn finish(mut self) -> Result<Image> {
        let fields = &mut self.fields;
        let url = decode::url("image/url", &required(fields, "image", "url")?)?;
        let title = required(fields, "image", "title")?;
        let link = decode::url("image/link", &required(fields, "image", "link")?)?;
        let description = fields.remove("description");
        let width = dimension(fields, "width", DEFAULT_IMAGE_WIDTH)?;
        let height = dimension(fields, "height", DEFAULT_IMAGE_HEIGHT)?;
        Ok(Image {
            url,
            title,
            link,
            description,
            width,
            height,
        })
    }
}

#[derive(Debug, Default)]
pub(crate) struct TextInputBuilder {
    fields: BTreeMap<String, String>,
}

impl ElementBuilder for TextInputBuilder {
    type Output = TextInput;
    const ELEMENT: &'static str = "textInput";

    fn consume(&mut self, cursor: &mut Cursor<'_>, start: &StartTag) -> Result<()> {
        self.fields = read_flat_map(cursor, start, Self::ELEMENT)?;
        Ok(())
    }

    fn finish(mut self) -> Result<TextInput> {
        let fields = &mut self.fields;
        let title = required(fields, Self::ELEMENT, "title")?;
        let description = required(fields, Self::ELEMENT, "description")?;
        let name = required(fields, Self::ELEMENT, "name")?;
        let link = decode::url("textInput/link", &required(fields, Self::ELEMENT, "link")?)?;
        Ok(TextInput {
            title,
            description,
            name,
            link,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::XmlEvent;

    fn build<B: ElementBuilder + Default>(xml: &str) -> Result<B::Output> {
        let mut cursor = Cursor::new(xml.as_bytes());
        let XmlEvent::Start(start) = cursor.next_event()? else {
            panic!("expected a start tag");
        };
        B::default().build(&mut cursor, &start)
    }

    const IMAGE: &str = "<url>https://example.com/logo.png</url>\
        <title>Example</title><link>https://example.com/</link>";

    #[test]
    fn image_defaults_to_88_by_31() {
        let image = build::<ImageBuilder>(&format!("<image>{IMAGE}</image>")).unwrap();
        assert_eq!(image.width(), 88);
        assert_eq!(image.height(), 31);
        assert_eq!(image.title(), "Example");
        assert_eq!(image.description(), None);
    }

    #[test]
    fn image_reads_explicit_dimensions() {
        let xml = format!("<image>{IMAGE}<width>144</width><height>0</height></image>");
        let image = build::<ImageBuilder>(&xml).unwrap();
        assert_eq!((image.width(), image.height()), (144, 0));
    }

    #[test]
    fn negative_dimensions_fail() {
        let xml = format!("<image>{IMAGE}<width>-1</width></image>");
        assert!(build::<ImageBuilder>(&xml).unwrap_err().is_invariant());
        let xml = format!("<image>{IMAGE}<height>-31</height></image>");
        assert!(build::<ImageBuilder>(&xml).unwrap_err().is_invariant());
    }

    #[test]
    fn image_requires_url_title_and_link() {
        let xml = "<image><title>t</title><link>https://example.com/</link></image>";
        assert!(build::<ImageBuilder>(xml).unwrap_err().is_invariant());
    }

    #[test]
    fn text_input_requires_every_field() {
        let full = "<textInput><title>Search</title><description>Search the archive</description>\
            <name>q</name><link>https://example.com/search</link></textInput>";
        let input = build::<TextInputBuilder>(full).unwrap();
        assert_eq!(input.name(), "q");
        assert_eq!(input.link().as_str(), "https://example.com/search");

        let missing = "<textInput><title>Search</title><name>q</name>\
            <link>https://example.com/search</link></textInput>";
        assert!(build::<TextInputBuilder>(missing).unwrap_err().is_invariant());
    }
}
