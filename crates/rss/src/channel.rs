// ABOUTME: Channel entity and its builder: feed-level metadata plus the ordered items.
// ABOUTME: title, link and description are required; skipHours fold 24 into 0.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use url::Url;

use crate::builder::{skip_unknown, ElementBuilder, FieldTracker};
use crate::category::{Category, CategoryBuilder};
use crate::cloud::{Cloud, CloudBuilder};
use crate::cursor::{Cursor, StartTag};
use crate::decode;
use crate::error::{Result, RssError};
use crate::image::{Image, ImageBuilder, TextInput, TextInputBuilder};
use crate::item::{Item, ItemBuilder};
use crate::modules::{ModuleHost, Modules};
use crate::options::ParserOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl FromStr for Day {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "monday" => Ok(Day::Monday),
            "tuesday" => Ok(Day::Tuesday),
            "wednesday" => Ok(Day::Wednesday),
            "thursday" => Ok(Day::Thursday),
            "friday" => Ok(Day::Friday),
            "saturday" => Ok(Day::Saturday),
            "sunday" => Ok(Day::Sunday),
            _ => Err("expected an English day name".to_string()),
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Channel {
    title: String,
    link: Url,
    description: String,
    language: Option<String>,
    copyright: Option<String>,
    managing_editor: Option<String>,
    web_master: Option<String>,
    pub_date: Option<DateTime<Utc>>,
    last_build_date: Option<DateTime<Utc>>,
    categories: BTreeSet<Category>,
    generator: Option<String>,
    docs: Option<Url>,
    cloud: Option<Cloud>,
    ttl: Option<u32>,
    image: Option<Image>,
    text_input: Option<TextInput>,
    rating: Option<String>,
    skip_hours: BTreeSet<u8>,
    skip_days: BTreeSet<Day>,
    items: Vec<Item>,
    #[serde(skip_serializing_if = "Modules::is_empty")]
    modules: Modules,
}

impl Channel {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn link(&self) -> &Url {
        &self.link
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn copyright(&self) -> Option<&str> {
        self.copyright.as_deref()
    }

    pub fn managing_editor(&self) -> Option<&str> {
        self.managing_editor.as_deref()
    }

    pub fn web_master(&self) -> Option<&str> {
        self.web_master.as_deref()
    }

    pub fn pub_date(&self) -> Option<DateTime<Utc>> {
        self.pub_date
    }

    pub fn last_build_date(&self) -> Option<DateTime<Utc>> {
        self.last_build_date
    }

    pub fn categories(&self) -> &BTreeSet<Category> {
        &self.categories
    }

    pub fn generator(&self) -> Option<&str> {
        self.generator.as_deref()
    }

    /// Where the format this feed uses is documented.
    pub fn docs(&self) -> Option<&Url> {
        self.docs.as_ref()
    }

    pub fn cloud(&self) -> Option<&Cloud> {
        self.cloud.as_ref()
    }

    /// Minutes the channel may be cached.
    pub fn ttl(&self) -> Option<u32> {
        self.ttl
    }

    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    pub fn text_input(&self) -> Option<&TextInput> {
        self.text_input.as_ref()
    }

    /// PICS rating, kept verbatim.
    pub fn rating(&self) -> Option<&str> {
        self.rating.as_deref()
    }

    /// GMT hours (0..=23) aggregators may skip.
    pub fn skip_hours(&self) -> &BTreeSet<u8> {
        &self.skip_hours
    }

    pub fn skip_days(&self) -> &BTreeSet<Day> {
        &self.skip_days
    }

    /// Items in document order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn modules(&self) -> &Modules {
        &self.modules
    }
}

pub(crate) struct ChannelBuilder<'a> {
    opts: &'a ParserOptions,
    fields: FieldTracker,
    host: ModuleHost<'a>,
    title: Option<String>,
    link: Option<Url>,
    description: Option<String>,
    language: Option<String>,
    copyright: Option<String>,
    managing_editor: Option<String>,
    web_master: Option<String>,
    pub_date: Option<DateTime<Utc>>,
    last_build_date: Option<DateTime<Utc>>,
    categories: BTreeSet<Category>,
    generator: Option<String>,
    docs: Option<Url>,
    cloud: Option<Cloud>,
    ttl: Option<i64>,
    image: Option<Image>,
    text_input: Option<TextInput>,
    rating: Option<String>,
    skip_hours: Vec<i64>,
    skip_days: BTreeSet<Day>,
    items: Vec<Item>,
}

impl<'a> ChannelBuilder<'a> {
    pub(crate) fn new(opts: &'a ParserOptions) -> Self {
        Self {
            opts,
            fields: FieldTracker::new(Self::ELEMENT),
            host: ModuleHost::new(
                Self::ELEMENT,
                &opts.registry,
                &opts.channel_modules,
                &opts.dates,
            ),
            title: None,
            link: None,
            description: None,
            language: None,
            copyright: None,
            managing_editor: None,
            web_master: None,
            pub_date: None,
            last_build_date: None,
            categories: BTreeSet::new(),
            generator: None,
            docs: None,
            cloud: None,
            ttl: None,
            image: None,
            text_input: None,
            rating: None,
            skip_hours: Vec::new(),
            skip_days: BTreeSet::new(),
            items: Vec::new(),
        }
    }

    /// Claims `tag` and returns its text.
    fn text(&mut self, cursor: &mut Cursor<'_>, child: &StartTag, tag: &str) -> Result<String> {
        self.fields.claim(tag)?;
        cursor.read_text(child)
    }

    fn read_skip_hours(&mut self, cursor: &mut Cursor<'_>, start: &StartTag) -> Result<()> {
        let hours = &mut self.skip_hours;
        cursor.children(start, |cursor, child| {
            if child.is_prefixed() || !child.local_name().eq_ignore_ascii_case("hour") {
                return skip_unknown(cursor, "skipHours", child);
            }
            hours.push(decode::integer("skipHours/hour", &cursor.read_text(child)?)?);
            Ok(())
        })
    }

    fn read_skip_days(&mut self, cursor: &mut Cursor<'_>, start: &StartTag) -> Result<()> {
        let days = &mut self.skip_days;
        cursor.children(start, |cursor, child| {
            if child.is_prefixed() || !child.local_name().eq_ignore_ascii_case("day") {
                return skip_unknown(cursor, "skipDays", child);
            }
            days.insert(decode::enumeration("skipDays/day", &cursor.read_text(child)?)?);
            Ok(())
        })
    }
}

/// Folds hour 24 into 0 and rejects anything outside 0..=24.
fn fold_skip_hours(raw: &[i64]) -> Result<BTreeSet<u8>> {
    raw.iter()
        .map(|&hour| match hour {
            24 => Ok(0),
            0..=23 => Ok(hour as u8),
            _ => Err(RssError::invariant(
                "channel",
                format!("skip hour {hour} is outside 0..=24"),
            )),
        })
        .collect()
}

impl ElementBuilder for ChannelBuilder<'_> {
    type Output = Channel;
    const ELEMENT: &'static str = "channel";

    fn child(&mut self, cursor: &mut Cursor<'_>, child: &StartTag) -> Result<()> {
        if child.is_prefixed() {
            return self.host.dispatch(cursor, child);
        }
        match child.local_name() {
            "title" => self.title = Some(self.text(cursor, child, "title")?),
            "link" => {
                let text = self.text(cursor, child, "link")?;
                self.link = Some(decode::url("channel/link", &text)?);
            }
            "description" => self.description = Some(self.text(cursor, child, "description")?),
            "language" => self.language = Some(self.text(cursor, child, "language")?),
            "copyright" => self.copyright = Some(self.text(cursor, child, "copyright")?),
            "managingEditor" => {
                self.managing_editor = Some(self.text(cursor, child, "managingEditor")?)
            }
            "webMaster" => self.web_master = Some(self.text(cursor, child, "webMaster")?),
            "pubDate" => {
                let text = self.text(cursor, child, "pubDate")?;
                self.pub_date = self.opts.dates.decode("channel/pubDate", &text)?;
            }
            "lastBuildDate" => {
                let text = self.text(cursor, child, "lastBuildDate")?;
                self.last_build_date = self.opts.dates.decode("channel/lastBuildDate", &text)?;
            }
            "category" => {
                self.categories
                    .insert(CategoryBuilder::default().build(cursor, child)?);
            }
            "generator" => self.generator = Some(self.text(cursor, child, "generator")?),
            "docs" => {
                let text = self.text(cursor, child, "docs")?;
                self.docs = decode::optional_url("channel/docs", &text)?;
            }
            "cloud" => {
                self.fields.claim("cloud")?;
                self.cloud = Some(CloudBuilder::default().build(cursor, child)?);
            }
            "ttl" => {
                let text = self.text(cursor, child, "ttl")?;
                self.ttl = Some(decode::integer("channel/ttl", &text)?);
            }
            "image" => {
                self.fields.claim("image")?;
                self.image = Some(ImageBuilder::default().build(cursor, child)?);
            }
            "textInput" => {
                self.fields.claim("textInput")?;
                self.text_input = Some(TextInputBuilder::default().build(cursor, child)?);
            }
            "rating" => self.rating = Some(self.text(cursor, child, "rating")?),
            "skipHours" => {
                self.fields.claim("skipHours")?;
                self.read_skip_hours(cursor, child)?;
            }
            "skipDays" => {
                self.fields.claim("skipDays")?;
                self.read_skip_days(cursor, child)?;
            }
            "item" => {
                let item = ItemBuilder::new(self.opts).build(cursor, child)?;
                self.items.push(item);
            }
            _ => skip_unknown(cursor, Self::ELEMENT, child)?,
        }
        Ok(())
    }

    fn finish(self) -> Result<Channel> {
        let title = self
            .title
            .ok_or_else(|| RssError::missing_field(Self::ELEMENT, "title"))?;
        let link = self
            .link
            .ok_or_else(|| RssError::missing_field(Self::ELEMENT, "link"))?;
        let description = self
            .description
            .ok_or_else(|| RssError::missing_field(Self::ELEMENT, "description"))?;
        let ttl = self
            .ttl
            .map(|ttl| {
                u32::try_from(ttl).map_err(|_| {
                    RssError::invariant(Self::ELEMENT, format!("ttl {ttl} is out of range"))
                })
            })
            .transpose()?;
        let skip_hours = fold_skip_hours(&self.skip_hours)?;

        Ok(Channel {
            title,
            link,
            description,
            language: self.language,
            copyright: self.copyright,
            managing_editor: self.managing_editor,
            web_master: self.web_master,
            pub_date: self.pub_date,
            last_build_date: self.last_build_date,
            categories: self.categories,
            generator: self.generator,
            docs: self.docs,
            cloud: self.cloud,
            ttl,
            image: self.image,
            text_input: self.text_input,
            rating: self.rating,
            skip_hours,
            skip_days: self.skip_days,
            items: self.items,
            modules: self.host.finish()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::XmlEvent;
    use pretty_assertions::assert_eq;

    const REQUIRED: &str =
        "<title>Example</title><link>https://example.com/</link><description>News</description>";

    fn build(body: &str) -> Result<Channel> {
        let opts = ParserOptions::default();
        let xml = format!("<channel>{body}</channel>");
        let mut cursor = Cursor::new(xml.as_bytes());
        let XmlEvent::Start(start) = cursor.next_event()? else {
            panic!("expected <channel>");
        };
        ChannelBuilder::new(&opts).build(&mut cursor, &start)
    }

    #[test]
    fn required_fields_are_returned() {
        let channel = build(REQUIRED).unwrap();
        assert_eq!(channel.title(), "Example");
        assert_eq!(channel.link().as_str(), "https://example.com/");
        assert_eq!(channel.description(), "News");
        assert!(channel.items().is_empty());
    }

    #[test]
    fn each_required_field_is_enforced() {
        for missing in ["title", "link", "description"] {
            let body: String = [
                ("title", "<title>Example</title>"),
                ("link", "<link>https://example.com/</link>"),
                ("description", "<description>News</description>"),
            ]
            .iter()
            .filter(|(name, _)| *name != missing)
            .map(|(_, xml)| *xml)
            .collect();
            let err = build(&body).unwrap_err();
            assert!(err.is_invariant(), "{missing}: {err}");
        }
    }

    #[test]
    fn hour_24_folds_into_0() {
        let channel = build(&format!(
            "{REQUIRED}<skipHours><hour>24</hour><Hour>5</Hour><hour>0</hour></skipHours>"
        ))
        .unwrap();
        assert_eq!(channel.skip_hours().iter().copied().collect::<Vec<_>>(), vec![0, 5]);
    }

    #[test]
    fn hours_outside_range_fail() {
        for hour in ["25", "-1"] {
            let err = build(&format!("{REQUIRED}<skipHours><hour>{hour}</hour></skipHours>"))
                .unwrap_err();
            assert!(err.is_invariant());
        }
    }

    #[test]
    fn skip_days_match_case_insensitively() {
        let channel = build(&format!(
            "{REQUIRED}<skipDays><day>saturday</day><Day>Sunday</Day></skipDays>"
        ))
        .unwrap();
        assert_eq!(
            channel.skip_days().iter().copied().collect::<Vec<_>>(),
            vec![Day::Saturday, Day::Sunday]
        );
        let err = build(&format!("{REQUIRED}<skipDays><day>Someday</day></skipDays>")).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn duplicate_title_fails() {
        let err = build(&format!("{REQUIRED}<title>Again</title>")).unwrap_err();
        assert!(err.is_duplicate_field());
    }

    #[test]
    fn skip_hours_is_write_once() {
        let err = build(&format!(
            "{REQUIRED}<skipHours><hour>1</hour></skipHours><skipHours><hour>2</hour></skipHours>"
        ))
        .unwrap_err();
        assert!(err.is_duplicate_field());
    }

    #[test]
    fn ttl_must_not_be_negative() {
        assert_eq!(build(&format!("{REQUIRED}<ttl>60</ttl>")).unwrap().ttl(), Some(60));
        let err = build(&format!("{REQUIRED}<ttl>-5</ttl>")).unwrap_err();
        assert!(err.is_invariant());
    }

    #[test]
    fn unknown_core_tags_are_skipped() {
        let channel = build(&format!(
            "{REQUIRED}<blogChannel><nested>x</nested></blogChannel><language>en-us</language>"
        ))
        .unwrap();
        assert_eq!(channel.language(), Some("en-us"));
    }
}
