// ABOUTME: Source entity: the channel an item was republished from.

use serde::Serialize;
use url::Url;

use crate::builder::ElementBuilder;
use crate::cursor::{Cursor, StartTag};
use crate::decode;
use crate::error::{Result, RssError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    name: String,
    url: Url,
}

impl Source {
    /// Title of the upstream channel.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Address of the upstream channel's feed.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[derive(Debug, Default)]
pub(crate) struct SourceBuilder {
    name: String,
    url: Option<Url>,
}

impl ElementBuilder for SourceBuilder {
    type Output = Source;
    const ELEMENT: &'static str = "source";

    fn open(&mut self, start: &StartTag) -> Result<()> {
        self.url = start
            .attr("url")
            .map(|u| decode::url("source@url", u))
            .transpose()?;
        Ok(())
    }

    fn consume(&mut self, cursor: &mut Cursor<'_>, start: &StartTag) -> Result<()> {
        self.name = cursor.read_text(start)?;
        self.open(start)
    }

    fn finish(self) -> Result<Source> {
        let url = self
            .url
            .ok_or_else(|| RssError::missing_field(Self::ELEMENT, "url"))?;
        Ok(Source {
            name: self.name,
            url,
        })
    }
}
