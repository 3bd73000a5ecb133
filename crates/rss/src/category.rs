// ABOUTME: Category entity shared by channels and items.
// ABOUTME: Equality and ordering by (domain, location) so categories live in a set.

use serde::Serialize;

use crate::builder::ElementBuilder;
use crate::cursor::{Cursor, StartTag};
use crate::error::{Result, RssError};

/// A taxonomy tag, e.g. `<category domain="http://www.fool.com/cusips">MSFT</category>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Category {
    domain: Option<String>,
    location: String,
}

impl Category {
    /// Fails when `location` is blank.
    pub fn new(domain: Option<String>, location: impl Into<String>) -> Result<Self> {
        let location = location.into();
        if location.trim().is_empty() {
            return Err(RssError::invariant("category", "category text is empty"));
        }
        Ok(Self {
            domain: domain.filter(|d| !d.trim().is_empty()),
            location,
        })
    }

    /// Identifies the taxonomy the location belongs to.
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Slash-delimited position in the taxonomy, e.g. `Business/Industries`.
    pub fn location(&self) -> &str {
        &self.location
    }
}

#[derive(Debug, Default)]
pub(crate) struct CategoryBuilder {
    domain: Option<String>,
    location: String,
}

impl ElementBuilder for CategoryBuilder {
    type Output = Category;
    const ELEMENT: &'static str = "category";

    fn open(&mut self, start: &StartTag) -> Result<()> {
        self.domain = start.attr("domain").map(|d| d.trim().to_string());
        Ok(())
    }

    fn consume(&mut self, cursor: &mut Cursor<'_>, start: &StartTag) -> Result<()> {
        self.location = cursor.read_text(start)?;
        self.open(start)
    }

    fn finish(self) -> Result<Category> {
        Category::new(self.domain, self.location)
    }
}
