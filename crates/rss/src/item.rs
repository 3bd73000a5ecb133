// ABOUTME: Item entity and its builder: one entry of a channel.
// ABOUTME: Needs a title or a description; prefixed children go through module dispatch.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use url::Url;

use crate::builder::{skip_unknown, ElementBuilder, FieldTracker};
use crate::category::{Category, CategoryBuilder};
use crate::cursor::{Cursor, StartTag};
use crate::decode;
use crate::enclosure::{Enclosure, EnclosureBuilder};
use crate::error::{Result, RssError};
use crate::guid::{Guid, GuidBuilder};
use crate::modules::{ModuleHost, Modules};
use crate::options::ParserOptions;
use crate::source::{Source, SourceBuilder};
use crate::time_parse::DateParser;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    title: Option<String>,
    link: Option<Url>,
    description: Option<String>,
    author: Option<String>,
    categories: BTreeSet<Category>,
    comments: Option<Url>,
    enclosures: Vec<Enclosure>,
    guid: Option<Guid>,
    pub_date: Option<DateTime<Utc>>,
    source: Option<Source>,
    #[serde(skip_serializing_if = "Modules::is_empty")]
    modules: Modules,
}

impl Item {
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn link(&self) -> Option<&Url> {
        self.link.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Email address of the author.
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn categories(&self) -> &BTreeSet<Category> {
        &self.categories
    }

    /// Page holding comments on the item.
    pub fn comments(&self) -> Option<&Url> {
        self.comments.as_ref()
    }

    pub fn enclosures(&self) -> &[Enclosure] {
        &self.enclosures
    }

    pub fn guid(&self) -> Option<&Guid> {
        self.guid.as_ref()
    }

    pub fn pub_date(&self) -> Option<DateTime<Utc>> {
        self.pub_date
    }

    pub fn source(&self) -> Option<&Source> {
        self.source.as_ref()
    }

    pub fn modules(&self) -> &Modules {
        &self.modules
    }
}

pub(crate) struct ItemBuilder<'a> {
    fields: FieldTracker,
    host: ModuleHost<'a>,
    dates: &'a DateParser,
    title: Option<String>,
    link: Option<Url>,
    description: Option<String>,
    author: Option<String>,
    categories: BTreeSet<Category>,
    comments: Option<Url>,
    enclosures: Vec<Enclosure>,
    guid: Option<Guid>,
    pub_date: Option<DateTime<Utc>>,
    source: Option<Source>,
}

impl<'a> ItemBuilder<'a> {
    pub(crate) fn new(opts: &'a ParserOptions) -> Self {
        Self {
            fields: FieldTracker::new(Self::ELEMENT),
            host: ModuleHost::new(
                Self::ELEMENT,
                &opts.registry,
                &opts.item_modules,
                &opts.dates,
            ),
            dates: &opts.dates,
            title: None,
            link: None,
            description: None,
            author: None,
            categories: BTreeSet::new(),
            comments: None,
            enclosures: Vec::new(),
            guid: None,
            pub_date: None,
            source: None,
        }
    }
}

impl ElementBuilder for ItemBuilder<'_> {
    type Output = Item;
    const ELEMENT: &'static str = "item";

    fn child(&mut self, cursor: &mut Cursor<'_>, child: &StartTag) -> Result<()> {
        if child.is_prefixed() {
            return self.host.dispatch(cursor, child);
        }
        match child.local_name() {
            "title" => {
                self.fields.claim("title")?;
                self.title = Some(cursor.read_text(child)?);
            }
            "link" => {
                self.fields.claim("link")?;
                self.link = decode::optional_url("item/link", &cursor.read_text(child)?)?;
            }
            "description" => {
                self.fields.claim("description")?;
                self.description = Some(cursor.read_text(child)?);
            }
            "author" => {
                self.fields.claim("author")?;
                self.author = Some(cursor.read_text(child)?);
            }
            "category" => {
                self.categories
                    .insert(CategoryBuilder::default().build(cursor, child)?);
            }
            "comments" => {
                self.fields.claim("comments")?;
                self.comments = decode::optional_url("item/comments", &cursor.read_text(child)?)?;
            }
            "enclosure" => {
                self.enclosures
                    .push(EnclosureBuilder::default().build(cursor, child)?);
            }
            "guid" => {
                self.fields.claim("guid")?;
                self.guid = Some(GuidBuilder::default().build(cursor, child)?);
            }
            "pubDate" => {
                self.fields.claim("pubDate")?;
                self.pub_date = self.dates.decode("item/pubDate", &cursor.read_text(child)?)?;
            }
            "source" => {
                self.fields.claim("source")?;
                self.source = Some(SourceBuilder::default().build(cursor, child)?);
            }
            _ => skip_unknown(cursor, Self::ELEMENT, child)?,
        }
        Ok(())
    }

    fn finish(self) -> Result<Item> {
        if self.title.is_none() && self.description.is_none() {
            return Err(RssError::invariant(
                Self::ELEMENT,
                "an item needs a title or a description",
            ));
        }
        Ok(Item {
            title: self.title,
            link: self.link,
            description: self.description,
            author: self.author,
            categories: self.categories,
            comments: self.comments,
            enclosures: self.enclosures,
            guid: self.guid,
            pub_date: self.pub_date,
            source: self.source,
            modules: self.host.finish()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::XmlEvent;
    use pretty_assertions::assert_eq;

    fn build(xml: &str) -> Result<Item> {
        let opts = ParserOptions::default();
        let mut cursor = Cursor::new(xml.as_bytes());
        let XmlEvent::Start(start) = cursor.next_event()? else {
            panic!("expected <item>");
        };
        ItemBuilder::new(&opts).build(&mut cursor, &start)
    }

    #[test]
    fn title_or_description_is_enough() {
        let item = build("<item><title>Only a title</title></item>").unwrap();
        assert_eq!(item.title(), Some("Only a title"));
        assert_eq!(item.description(), None);

        let item = build("<item><description>Only a body</description></item>").unwrap();
        assert_eq!(item.title(), None);
        assert_eq!(item.description(), Some("Only a body"));
    }

    #[test]
    fn neither_title_nor_description_fails() {
        let err = build("<item><link>https://example.com/</link></item>").unwrap_err();
        assert!(err.is_invariant());
    }

    #[test]
    fn categories_and_enclosures_accumulate() {
        let xml = r#"<item>
            <title>Episode 1</title>
            <category>Tech</category>
            <category domain="https://example.com/tags">Rust</category>
            <enclosure url="https://cdn.example.com/1.mp3" length="10" type="audio/mpeg"/>
            <enclosure url="https://cdn.example.com/1.ogg" length="12" type="audio/ogg"/>
        </item>"#;
        let item = build(xml).unwrap();
        let categories: Vec<_> = item.categories().iter().map(|c| c.location()).collect();
        assert_eq!(categories, vec!["Tech", "Rust"]);
        assert_eq!(item.enclosures().len(), 2);
    }

    #[test]
    fn duplicate_guid_fails() {
        let xml = "<item><title>t</title><guid>a</guid><guid>b</guid></item>";
        assert!(build(xml).unwrap_err().is_duplicate_field());
    }

    #[test]
    fn reads_guid_date_and_source() {
        let xml = r#"<item>
            <title>t</title>
            <guid isPermaLink="false">tag:example.com,2013:1</guid>
            <pubDate>Sat, 12 Oct 2013 18:50:26 GMT</pubDate>
            <source url="https://upstream.example.com/rss">Upstream</source>
            <comments></comments>
        </item>"#;
        let item = build(xml).unwrap();
        let guid = item.guid().unwrap();
        assert_eq!(guid.value(), "tag:example.com,2013:1");
        assert!(!guid.is_permalink());
        assert_eq!(
            item.pub_date().unwrap().to_rfc3339(),
            "2013-10-12T18:50:26+00:00"
        );
        assert_eq!(item.source().unwrap().name(), "Upstream");
        assert_eq!(item.comments(), None);
    }
}
