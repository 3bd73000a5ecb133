// ABOUTME: The element builder contract shared by every entity builder.
// ABOUTME: Walks one element's subtree, enforces write-once fields, and yields an immutable entity.

use std::collections::{BTreeMap, HashSet};

use crate::cursor::{Cursor, StartTag};
use crate::error::{Result, RssError};

/// Accumulates the fields of one element and turns them into an entity.
///
/// A builder is single-use: `consume` reads the element opened by `start`
/// through its end tag, then `finish` validates what was collected.
pub trait ElementBuilder: Sized {
    type Output;

    /// Element name used in error messages and logs.
    const ELEMENT: &'static str;

    /// Inspects the attributes of the element's start tag.
    fn open(&mut self, _start: &StartTag) -> Result<()> {
        Ok(())
    }

    /// Handles one child start tag. The cursor sits right after it.
    ///
    /// Builders of text-only elements keep the default, which skips.
    fn child(&mut self, cursor: &mut Cursor<'_>, child: &StartTag) -> Result<()> {
        skip_unknown(cursor, Self::ELEMENT, child)
    }

    /// Validates the accumulated state and produces the entity.
    fn finish(self) -> Result<Self::Output>;

    /// Reads the element through its end tag, dispatching every child to
    /// [`ElementBuilder::child`]. The cursor ends up after the end tag even
    /// when an error is returned.
    fn consume(&mut self, cursor: &mut Cursor<'_>, start: &StartTag) -> Result<()> {
        if let Err(err) = self.open(start) {
            let _ = cursor.skip_element(start);
            return Err(err);
        }
        cursor.children(start, |cursor, child| self.child(cursor, child))
    }

    /// Consumes the element and finishes the builder in one step.
    fn build(mut self, cursor: &mut Cursor<'_>, start: &StartTag) -> Result<Self::Output> {
        self.consume(cursor, start)?;
        self.finish()
    }
}

/// Tracks which single-valued tags an element has already seen.
#[derive(Debug)]
pub struct FieldTracker {
    element: &'static str,
    seen: HashSet<String>,
}

impl FieldTracker {
    pub fn new(element: &'static str) -> Self {
        Self {
            element,
            seen: HashSet::new(),
        }
    }

    /// Records `field`, failing if it was already recorded.
    pub fn claim(&mut self, field: &str) -> Result<()> {
        if !self.seen.insert(field.to_string()) {
            return Err(RssError::duplicate(self.element, field));
        }
        Ok(())
    }
}

/// Skips a child nobody recognises.
pub(crate) fn skip_unknown(cursor: &mut Cursor<'_>, parent: &str, child: &StartTag) -> Result<()> {
    tracing::debug!(parent, tag = child.name(), "skipping unknown element");
    cursor.skip_element(child)
}

/// Flattens the children of `start` into a tag → text map.
///
/// Used for elements whose grammar has no ordering or repetition. A tag seen
/// twice is a duplicate-field error; prefixed children are ignored.
pub(crate) fn read_flat_map(
    cursor: &mut Cursor<'_>,
    start: &StartTag,
    element: &'static str,
) -> Result<BTreeMap<String, String>> {
    let mut fields = BTreeMap::new();
    cursor.children(start, |cursor, child| {
        if child.is_prefixed() {
            return skip_unknown(cursor, element, child);
        }
        let text = cursor.read_text(child)?;
        if fields.insert(child.local_name().to_string(), text).is_some() {
            return Err(RssError::duplicate(element, child.local_name()));
        }
        Ok(())
    })?;
    Ok(fields)
}
