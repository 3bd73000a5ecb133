// ABOUTME: Guid entity: an item's unique identifier, optionally a permalink.
// ABOUTME: isPermaLink defaults to true; only permalinks convert to a URL.

use serde::Serialize;
use url::Url;

use crate::builder::ElementBuilder;
use crate::cursor::{Cursor, StartTag};
use crate::decode;
use crate::error::{Result, RssError};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Guid {
    value: String,
    is_permalink: bool,
}

impl Guid {
    pub fn new(value: impl Into<String>, is_permalink: bool) -> Result<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(RssError::invariant("guid", "guid is empty"));
        }
        Ok(Self {
            value,
            is_permalink,
        })
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_permalink(&self) -> bool {
        self.is_permalink
    }

    /// The guid as a URL. Fails when it is not a permalink or not a URL.
    pub fn to_url(&self) -> Result<Url> {
        if !self.is_permalink {
            return Err(RssError::invariant(
                "guid",
                "isPermaLink is false; the guid is not a URL",
            ));
        }
        decode::url("guid", &self.value)
    }
}

#[derive(Debug)]
pub(crate) struct GuidBuilder {
    value: String,
    is_permalink: bool,
}

impl Default for GuidBuilder {
    fn default() -> Self {
        Self {
            value: String::new(),
            is_permalink: true,
        }
    }
}

impl ElementBuilder for GuidBuilder {
    type Output = Guid;
    const ELEMENT: &'static str = "guid";

    fn open(&mut self, start: &StartTag) -> Result<()> {
        if let Some(flag) = start.attr("isPermaLink") {
            self.is_permalink = decode::boolean("guid@isPermaLink", flag)?;
        }
        Ok(())
    }

    fn consume(&mut self, cursor: &mut Cursor<'_>, start: &StartTag) -> Result<()> {
        self.value = cursor.read_text(start)?;
        self.open(start)
    }

    fn finish(self) -> Result<Guid> {
        Guid::new(self.value, self.is_permalink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permalinks_convert_to_urls() {
        let guid = Guid::new("https://example.com/posts/1", true).unwrap();
        assert_eq!(guid.to_url().unwrap().as_str(), "https://example.com/posts/1");
    }

    #[test]
    fn opaque_ids_do_not_convert() {
        let guid = Guid::new("https://example.com/posts/1", false).unwrap();
        assert!(guid.to_url().unwrap_err().is_invariant());
        let guid = Guid::new("post-1", true).unwrap();
        assert!(guid.to_url().unwrap_err().is_decode());
    }

    #[test]
    fn empty_guid_is_rejected() {
        assert!(Guid::new("", true).is_err());
    }
}
