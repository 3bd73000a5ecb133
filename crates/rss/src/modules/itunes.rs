// ABOUTME: iTunes podcast module: author, owner, explicit rating, duration and category tree.
// ABOUTME: Categories nest recursively; owner name/email live under one itunes:owner element.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;
use url::Url;

use crate::builder::{skip_unknown, FieldTracker};
use crate::cursor::{Cursor, StartTag};
use crate::decode;
use crate::duration_parse::parse_duration;
use crate::error::{Result, RssError};
use crate::modules::{Module, ModuleBuilder};
use crate::time_parse::DateParser;

/// Parental-advisory rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Explicit {
    Yes,
    Clean,
    No,
}

impl FromStr for Explicit {
    type Err = String;

    /// Accepts "yes"/"true"/"explicit", "clean", and "no"/"false", case-insensitively.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yes" | "true" | "explicit" => Ok(Explicit::Yes),
            "clean" => Ok(Explicit::Clean),
            "no" | "false" => Ok(Explicit::No),
            _ => Err("expected yes, clean or no".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowType {
    Episodic,
    Serial,
}

impl FromStr for ShowType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "episodic" => Ok(ShowType::Episodic),
            "serial" => Ok(ShowType::Serial),
            _ => Err("expected episodic or serial".to_string()),
        }
    }
}

impl fmt::Display for ShowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShowType::Episodic => write!(f, "episodic"),
            ShowType::Serial => write!(f, "serial"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItunesOwner {
    name: Option<String>,
    email: String,
}

impl ItunesOwner {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// One node of the category tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItunesCategory {
    text: String,
    subcategories: Vec<ItunesCategory>,
}

impl ItunesCategory {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn subcategories(&self) -> &[ItunesCategory] {
        &self.subcategories
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Itunes {
    author: Option<String>,
    owner: Option<ItunesOwner>,
    explicit: Option<Explicit>,
    duration: Option<Duration>,
    categories: Vec<ItunesCategory>,
    image: Option<Url>,
    title: Option<String>,
    subtitle: Option<String>,
    summary: Option<String>,
    keywords: Vec<String>,
    block: bool,
    complete: bool,
    new_feed_url: Option<Url>,
    show_type: Option<ShowType>,
}

impl Itunes {
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn owner(&self) -> Option<&ItunesOwner> {
        self.owner.as_ref()
    }

    pub fn explicit(&self) -> Option<Explicit> {
        self.explicit
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Top-level categories in document order.
    pub fn categories(&self) -> &[ItunesCategory] {
        &self.categories
    }

    /// Artwork URL from `itunes:image@href`.
    pub fn image(&self) -> Option<&Url> {
        self.image.as_ref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// True when the show asks directories to hide it.
    pub fn block(&self) -> bool {
        self.block
    }

    /// True when no more episodes will be published.
    pub fn complete(&self) -> bool {
        self.complete
    }

    pub fn new_feed_url(&self) -> Option<&Url> {
        self.new_feed_url.as_ref()
    }

    pub fn show_type(&self) -> Option<ShowType> {
        self.show_type
    }
}

struct ItunesBuilder {
    fields: FieldTracker,
    itunes: Itunes,
}

pub(crate) fn factory(_: &DateParser) -> Box<dyn ModuleBuilder> {
    Box::new(ItunesBuilder {
        fields: FieldTracker::new("itunes"),
        itunes: Itunes::default(),
    })
}

impl ModuleBuilder for ItunesBuilder {
    fn consume(&mut self, cursor: &mut Cursor<'_>, element: &StartTag) -> Result<()> {
        let name = element.local_name();
        match name {
            "category" => {
                let category = read_category(cursor, element)?;
                self.itunes.categories.push(category);
                return Ok(());
            }
            "author" | "owner" | "explicit" | "duration" | "image" | "title" | "subtitle"
            | "summary" | "keywords" | "block" | "complete" | "new-feed-url" | "type" => {
                self.fields.claim(name)?;
            }
            _ => return skip_unknown(cursor, "itunes", element),
        }

        let it = &mut self.itunes;
        match name {
            "owner" => it.owner = Some(read_owner(cursor, element)?),
            "image" => {
                let href = element
                    .attr("href")
                    .ok_or_else(|| RssError::invariant("itunes:image", "missing href attribute"))?;
                it.image = Some(decode::url("itunes:image", href)?);
                cursor.skip_element(element)?;
            }
            _ => {
                let text = cursor.read_text(element)?;
                match name {
                    "author" => it.author = Some(text),
                    "title" => it.title = Some(text),
                    "subtitle" => it.subtitle = Some(text),
                    "summary" => it.summary = Some(text),
                    "explicit" => it.explicit = Some(decode::enumeration("itunes:explicit", &text)?),
                    "duration" if text.is_empty() => {}
                    "duration" => {
                        let duration = parse_duration(&text).ok_or_else(|| {
                            RssError::decode("itunes:duration", &text, "not a duration")
                        })?;
                        it.duration = Some(duration);
                    }
                    "keywords" => {
                        it.keywords = text
                            .split(',')
                            .map(str::trim)
                            .filter(|k| !k.is_empty())
                            .map(String::from)
                            .collect();
                    }
                    "block" => it.block = is_yes(&text),
                    "complete" => it.complete = is_yes(&text),
                    "new-feed-url" => it.new_feed_url = Some(decode::url("itunes:new-feed-url", &text)?),
                    "type" => it.show_type = Some(decode::enumeration("itunes:type", &text)?),
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<Module> {
        Ok(Module::Itunes(self.itunes))
    }
}

fn is_yes(text: &str) -> bool {
    text.eq_ignore_ascii_case("yes")
}

/// Reads one `itunes:category` and, recursively, the categories inside it.
fn read_category(cursor: &mut Cursor<'_>, start: &StartTag) -> Result<ItunesCategory> {
    let text = start.attr("text").map(str::trim).unwrap_or_default().to_string();
    let mut subcategories = Vec::new();
    cursor.children(start, |cursor, child| {
        if in_namespace_of(start, child) && child.local_name() == "category" {
            subcategories.push(read_category(cursor, child)?);
            Ok(())
        } else {
            skip_unknown(cursor, "itunes:category", child)
        }
    })?;
    if text.is_empty() {
        return Err(RssError::invariant(
            "itunes:category",
            "missing text attribute",
        ));
    }
    Ok(ItunesCategory {
        text,
        subcategories,
    })
}

fn read_owner(cursor: &mut Cursor<'_>, start: &StartTag) -> Result<ItunesOwner> {
    let mut fields = FieldTracker::new("itunes:owner");
    let mut name = None;
    let mut email = None;
    cursor.children(start, |cursor, child| match child.local_name() {
        _ if !in_namespace_of(start, child) => skip_unknown(cursor, "itunes:owner", child),
        "name" => {
            fields.claim("name")?;
            name = Some(cursor.read_text(child)?);
            Ok(())
        }
        "email" => {
            fields.claim("email")?;
            email = Some(cursor.read_text(child)?);
            Ok(())
        }
        _ => skip_unknown(cursor, "itunes:owner", child),
    })?;
    let email = email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| RssError::missing_field("itunes:owner", "email"))?;
    Ok(ItunesOwner { name, email })
}

/// Nested iTunes elements only count when they share their parent's namespace.
fn in_namespace_of(parent: &StartTag, child: &StartTag) -> bool {
    child.namespace().is_some() && child.namespace() == parent.namespace()
}
