// ABOUTME: Enclosure entity: a media file attached to an item.
// ABOUTME: url must be http/https, length must not be negative, type must be a MIME type.

use serde::Serialize;
use url::Url;

use crate::builder::ElementBuilder;
use crate::cursor::{Cursor, StartTag};
use crate::decode::{self, MimeType};
use crate::error::{Result, RssError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enclosure {
    url: Url,
    length: u64,
    #[serde(rename = "type")]
    mime_type: MimeType,
}

impl Enclosure {
    /// Fails unless `url` uses http or https.
    pub fn new(url: Url, length: u64, mime_type: MimeType) -> Result<Self> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(RssError::invariant(
                "enclosure",
                format!("url scheme must be http or https, got {:?}", url.scheme()),
            ));
        }
        Ok(Self {
            url,
            length,
            mime_type,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Size in bytes as declared by the feed.
    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn mime_type(&self) -> &MimeType {
        &self.mime_type
    }
}

#[derive(Debug, Default)]
pub(crate) struct EnclosureBuilder {
    url: Option<Url>,
    length: Option<i64>,
    mime_type: Option<MimeType>,
}

impl ElementBuilder for EnclosureBuilder {
    type Output = Enclosure;
    const ELEMENT: &'static str = "enclosure";

    fn open(&mut self, start: &StartTag) -> Result<()> {
        self.url = start
            .attr("url")
            .map(|u| decode::url("enclosure@url", u))
            .transpose()?;
        self.length = start
            .attr("length")
            .map(|l| decode::integer("enclosure@length", l))
            .transpose()?;
        self.mime_type = start
            .attr("type")
            .map(|t| decode::mime_type("enclosure@type", t))
            .transpose()?;
        Ok(())
    }

    fn consume(&mut self, cursor: &mut Cursor<'_>, start: &StartTag) -> Result<()> {
        cursor.skip_element(start)?;
        self.open(start)
    }

    fn finish(self) -> Result<Enclosure> {
        let url = self
            .url
            .ok_or_else(|| RssError::missing_field(Self::ELEMENT, "url"))?;
        let length = self
            .length
            .ok_or_else(|| RssError::missing_field(Self::ELEMENT, "length"))?;
        let length = u64::try_from(length).map_err(|_| {
            RssError::invariant(Self::ELEMENT, format!("length must not be negative, got {length}"))
        })?;
        let mime_type = self
            .mime_type
            .ok_or_else(|| RssError::missing_field(Self::ELEMENT, "type"))?;
        Enclosure::new(url, length, mime_type)
    }
}
