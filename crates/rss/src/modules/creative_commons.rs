// ABOUTME: Creative Commons RSS module: license URIs attached to a channel or item.
// ABOUTME: Accepts repeated cc:license elements and requires at least one.

use serde::Serialize;
use url::Url;

use crate::builder::skip_unknown;
use crate::cursor::{Cursor, StartTag};
use crate::decode;
use crate::error::{Result, RssError};
use crate::modules::{Module, ModuleBuilder};
use crate::time_parse::DateParser;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreativeCommons {
    licenses: Vec<Url>,
}

impl CreativeCommons {
    /// License URIs in document order.
    pub fn licenses(&self) -> &[Url] {
        &self.licenses
    }
}

#[derive(Debug, Default)]
struct CreativeCommonsBuilder {
    licenses: Vec<Url>,
}

pub(crate) fn factory(_: &DateParser) -> Box<dyn ModuleBuilder> {
    Box::new(CreativeCommonsBuilder::default())
}

impl ModuleBuilder for CreativeCommonsBuilder {
    fn consume(&mut self, cursor: &mut Cursor<'_>, element: &StartTag) -> Result<()> {
        match element.local_name() {
            "license" => {
                let text = cursor.read_text(element)?;
                self.licenses.push(decode::uri("cc:license", &text)?);
                Ok(())
            }
            _ => skip_unknown(cursor, "creativeCommons", element),
        }
    }

    fn finish(self: Box<Self>) -> Result<Module> {
        if self.licenses.is_empty() {
            return Err(RssError::invariant(
                "creativeCommons",
                "at least one <license> is required",
            ));
        }
        Ok(Module::CreativeCommons(CreativeCommons {
            licenses: self.licenses,
        }))
    }
}
