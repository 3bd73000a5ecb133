// ABOUTME: Forward-only XML event cursor over quick-xml's namespace-aware reader.
// ABOUTME: Yields owned start/end/text events and tracks element depth for subtree skipping.

use std::io::BufRead;

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

use crate::error::{Result, RssError};

/// An opened element: its qualified name, resolved namespace and attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    name: String,
    local_name: String,
    prefix: Option<String>,
    namespace: Option<String>,
    attributes: Vec<(String, String)>,
    depth: usize,
}

impl StartTag {
    /// Qualified name as written, e.g. `itunes:owner`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Namespace URI bound to the prefix, if the prefix was declared.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// True when the name carries a namespace prefix.
    pub fn is_prefixed(&self) -> bool {
        self.prefix.is_some()
    }

    /// Looks up an attribute by its qualified name.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Nesting level of this element; the document root is 1.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// One event read from the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent {
    /// The `<?xml ...?>` prologue with its declared encoding label.
    Declaration { encoding: Option<String> },
    Start(StartTag),
    End,
    Text(String),
    Eof,
}

/// Sequential cursor over the events of one document.
///
/// Comments, processing instructions and the doctype are dropped, `<a/>` is
/// reported as a start immediately followed by an end, and entity references
/// come back as text.
pub struct Cursor<'r> {
    reader: NsReader<Box<dyn BufRead + 'r>>,
    buf: Vec<u8>,
    open: Vec<String>,
}

impl<'r> Cursor<'r> {
    pub fn new<R: BufRead + 'r>(input: R) -> Self {
        let input: Box<dyn BufRead + 'r> = Box::new(input);
        let mut reader = NsReader::from_reader(input);
        reader.config_mut().expand_empty_elements = true;
        Self {
            reader,
            buf: Vec::new(),
            open: Vec::new(),
        }
    }

    /// Number of elements currently open.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Reads the next event.
    ///
    /// Reaching the end of input while an element is open is an error.
    pub fn next_event(&mut self) -> Result<XmlEvent> {
        loop {
            self.buf.clear();
            let event = self.reader.read_event_into(&mut self.buf)?;
            let decoder = self.reader.decoder();
            match event {
                Event::Start(e) => {
                    let tag = read_start_tag(&self.reader, &e, self.open.len() + 1)?;
                    self.open.push(tag.name.clone());
                    return Ok(XmlEvent::Start(tag));
                }
                Event::End(_) => {
                    self.open.pop();
                    return Ok(XmlEvent::End);
                }
                Event::Text(e) => {
                    let text = decoder.decode(&e).map_err(RssError::malformed)?;
                    return Ok(XmlEvent::Text(text.into_owned()));
                }
                Event::CData(e) => {
                    let text = decoder.decode(&e).map_err(RssError::malformed)?;
                    return Ok(XmlEvent::Text(text.into_owned()));
                }
                Event::GeneralRef(e) => {
                    let name = decoder.decode(&e).map_err(RssError::malformed)?;
                    return Ok(XmlEvent::Text(resolve_reference(&name)));
                }
                Event::Decl(e) => {
                    let encoding = match e.encoding() {
                        Some(Ok(label)) => Some(
                            decoder
                                .decode(&label)
                                .map_err(RssError::malformed)?
                                .into_owned(),
                        ),
                        Some(Err(err)) => return Err(RssError::malformed(err)),
                        None => None,
                    };
                    return Ok(XmlEvent::Declaration { encoding });
                }
                Event::Eof => {
                    if let Some(name) = self.open.last() {
                        return Err(RssError::UnexpectedEof(name.clone()));
                    }
                    return Ok(XmlEvent::Eof);
                }
                _ => continue,
            }
        }
    }

    /// Walks the children of `start`, handing each child start tag to `handle`.
    ///
    /// Returns once the end tag of `start` has been read. Whatever `handle`
    /// leaves unread of its child is skipped; if `handle` fails, the rest of
    /// `start` is drained before the error is returned.
    pub fn children<F>(&mut self, start: &StartTag, mut handle: F) -> Result<()>
    where
        F: FnMut(&mut Self, &StartTag) -> Result<()>,
    {
        let level = start.depth;
        while self.open.len() >= level {
            if let XmlEvent::Start(child) = self.next_event()? {
                if let Err(err) = handle(self, &child) {
                    // The handler's error wins over anything hit while draining.
                    let _ = self.skip_to(level - 1);
                    return Err(err);
                }
                self.skip_to(level)?;
            }
        }
        Ok(())
    }

    /// Reads the text content of `start` through its end tag.
    ///
    /// Text of nested elements is included; the result is trimmed.
    pub fn read_text(&mut self, start: &StartTag) -> Result<String> {
        let mut text = String::new();
        while self.open.len() >= start.depth {
            if let XmlEvent::Text(chunk) = self.next_event()? {
                text.push_str(&chunk);
            }
        }
        Ok(text.trim().to_string())
    }

    /// Discards everything up to and including the end tag of `start`.
    pub fn skip_element(&mut self, start: &StartTag) -> Result<()> {
        self.skip_to(start.depth - 1)
    }

    fn skip_to(&mut self, level: usize) -> Result<()> {
        while self.open.len() > level {
            self.next_event()?;
        }
        Ok(())
    }
}

fn read_start_tag<R>(reader: &NsReader<R>, e: &BytesStart<'_>, depth: usize) -> Result<StartTag> {
    let decoder = reader.decoder();
    let qname = e.name();
    let name = decoder
        .decode(qname.as_ref())
        .map_err(RssError::malformed)?
        .into_owned();
    let prefix = match qname.prefix() {
        Some(p) => Some(
            decoder
                .decode(p.as_ref())
                .map_err(RssError::malformed)?
                .into_owned(),
        ),
        None => None,
    };

    let (resolved, local) = reader.resolve_element(qname);
    let local_name = decoder
        .decode(local.as_ref())
        .map_err(RssError::malformed)?
        .into_owned();
    let namespace = match resolved {
        ResolveResult::Bound(ns) => Some(
            decoder
                .decode(ns.as_ref())
                .map_err(RssError::malformed)?
                .into_owned(),
        ),
        _ => None,
    };

    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(RssError::malformed)?;
        let key = decoder
            .decode(attr.key.as_ref())
            .map_err(RssError::malformed)?
            .into_owned();
        let value = attr
            .decode_and_unescape_value(decoder)
            .map_err(RssError::malformed)?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(StartTag {
        name,
        local_name,
        prefix,
        namespace,
        attributes,
        depth,
    })
}

/// Expands a general entity reference (`amp`, `#38`, `#x26`).
/// Unknown named entities are kept verbatim.
fn resolve_reference(name: &str) -> String {
    if let Some(code) = name.strip_prefix('#') {
        let parsed = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        };
        if let Some(ch) = parsed.and_then(char::from_u32) {
            return ch.to_string();
        }
    } else if let Some(text) = resolve_predefined_entity(name) {
        return text.to_string();
    }
    format!("&{};", name)
}
