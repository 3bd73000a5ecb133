// ABOUTME: Document parser: finds <rss> and its <channel>, then assembles the Document.
// ABOUTME: Parser holds immutable options and can be shared across threads.

use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

use serde::Serialize;

use crate::builder::{skip_unknown, ElementBuilder};
use crate::channel::{Channel, ChannelBuilder};
use crate::cursor::{Cursor, XmlEvent};
use crate::decode;
use crate::error::{Result, RssError};
use crate::options::{ParserBuilder, ParserOptions};

const DEFAULT_ENCODING: &str = "UTF-8";

/// The RSS dialects a document may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Version {
    #[serde(rename = "0.91")]
    V0_91,
    #[serde(rename = "0.92")]
    V0_92,
    #[serde(rename = "0.93")]
    V0_93,
    #[serde(rename = "0.94")]
    V0_94,
    #[serde(rename = "2.0")]
    V2_0,
}

impl FromStr for Version {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "0.91" => Ok(Version::V0_91),
            "0.92" => Ok(Version::V0_92),
            "0.93" => Ok(Version::V0_93),
            "0.94" => Ok(Version::V0_94),
            // Seen in the wild often enough to accept.
            "2.0" | "2" => Ok(Version::V2_0),
            _ => Err("unsupported RSS version".to_string()),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Version::V0_91 => "0.91",
            Version::V0_92 => "0.92",
            Version::V0_93 => "0.93",
            Version::V0_94 => "0.94",
            Version::V2_0 => "2.0",
        };
        write!(f, "{}", s)
    }
}

/// A parsed RSS document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    encoding: String,
    version: Version,
    channel: Channel,
}

impl Document {
    /// Canonical name of the declared encoding, `UTF-8` when undeclared.
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    pub fn into_channel(self) -> Channel {
        self.channel
    }
}

/// Parses RSS documents with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    opts: ParserOptions,
}

impl Parser {
    pub fn new(opts: ParserOptions) -> Self {
        Self { opts }
    }

    pub fn builder() -> ParserBuilder {
        ParserBuilder::new()
    }

    pub fn options(&self) -> &ParserOptions {
        &self.opts
    }

    /// Reads one document from `reader`.
    ///
    /// Input after the channel is still read to the end, so a truncated or
    /// malformed tail fails the parse.
    pub fn parse<R: BufRead>(&self, reader: R) -> Result<Document> {
        let mut cursor = Cursor::new(reader);

        let mut declared = None;
        let root = loop {
            match cursor.next_event()? {
                XmlEvent::Declaration { encoding } => declared = encoding,
                XmlEvent::Start(tag) => break tag,
                XmlEvent::Eof => return Err(RssError::MissingElement("rss")),
                _ => {}
            }
        };
        if root.name() != "rss" {
            return Err(RssError::MissingElement("rss"));
        }

        let version: Version = match root.attr("version") {
            Some(v) => decode::enumeration("rss@version", v)?,
            None => return Err(RssError::missing_field("rss", "version")),
        };

        let opts = &self.opts;
        let mut channel = None;
        let mut first = true;
        cursor.children(&root, |cursor, child| {
            if !first {
                return skip_unknown(cursor, "rss", child);
            }
            first = false;
            if child.name() != "channel" {
                return Err(RssError::MissingElement("channel"));
            }
            channel = Some(ChannelBuilder::new(opts).build(cursor, child)?);
            Ok(())
        })?;
        let channel = channel.ok_or(RssError::MissingElement("channel"))?;

        while !matches!(cursor.next_event()?, XmlEvent::Eof) {}

        let encoding = canonical_encoding(declared);
        tracing::debug!(
            %version,
            encoding = %encoding,
            items = channel.items().len(),
            "parsed rss document"
        );
        Ok(Document {
            encoding,
            version,
            channel,
        })
    }

    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Document> {
        self.parse(bytes)
    }

    pub fn parse_str(&self, s: &str) -> Result<Document> {
        self.parse(s.as_bytes())
    }
}

/// Parses a document with the default configuration.
pub fn parse<R: BufRead>(reader: R) -> Result<Document> {
    Parser::default().parse(reader)
}

fn canonical_encoding(label: Option<String>) -> String {
    match label {
        Some(label) => encoding_rs::Encoding::for_label(label.trim().as_bytes())
            .map(|e| e.name().to_string())
            .unwrap_or(label),
        None => DEFAULT_ENCODING.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_alias() {
        assert_eq!("2".parse::<Version>().unwrap(), Version::V2_0);
        assert_eq!("0.91".parse::<Version>().unwrap().to_string(), "0.91");
        assert!("3.0".parse::<Version>().is_err());
        assert!("2.00".parse::<Version>().is_err());
    }

    #[test]
    fn encoding_labels_are_canonicalised() {
        assert_eq!(canonical_encoding(None), "UTF-8");
        assert_eq!(canonical_encoding(Some("utf-8".into())), "UTF-8");
        assert_eq!(canonical_encoding(Some("latin1".into())), "windows-1252");
        assert_eq!(canonical_encoding(Some("x-unknown".into())), "x-unknown");
    }
}
