// ABOUTME: Primitive decoders turning element text and attribute values into typed values.
// ABOUTME: URLs, URIs, integers, booleans, MIME types and paths; each failure names its field.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use url::Url;

use crate::error::{Result, RssError};

/// Decodes an absolute URL with a network scheme.
pub fn url(field: &str, value: &str) -> Result<Url> {
    let parsed = uri(field, value)?;
    if parsed.cannot_be_a_base() {
        return Err(RssError::decode(field, value, "not a hierarchical URL"));
    }
    Ok(parsed)
}

/// Like [`url`], but blank text is no value.
pub fn optional_url(field: &str, value: &str) -> Result<Option<Url>> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    url(field, value).map(Some)
}

/// Decodes any absolute URI, including opaque ones such as `urn:` or `mailto:`.
pub fn uri(field: &str, value: &str) -> Result<Url> {
    Url::parse(value.trim()).map_err(|e| RssError::decode(field, value, e))
}

/// Decodes a signed decimal integer. Range checks belong to the entity.
pub fn integer(field: &str, value: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|e| RssError::decode(field, value, e))
}

/// Decodes `true`/`false`, case-insensitively.
pub fn boolean(field: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(RssError::decode(field, value, "expected true or false")),
    }
}

/// Decodes a server path, e.g. the `path` of a `<cloud>`.
pub fn path(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(RssError::decode(field, value, "path contains whitespace"));
    }
    Ok(value.to_string())
}

/// Decodes an enumeration literal through its `FromStr` impl.
pub fn enumeration<T>(field: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| RssError::decode(field, value, e))
}

/// A syntactically valid MIME type such as `audio/mpeg` or `text/html; charset=utf-8`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MimeType(String);

impl MimeType {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Top-level type, e.g. `audio`.
    pub fn type_(&self) -> &str {
        self.essence().split('/').next().unwrap_or_default()
    }

    /// Subtype without parameters, e.g. `mpeg`.
    pub fn subtype(&self) -> &str {
        self.essence().split('/').nth(1).unwrap_or_default()
    }

    fn essence(&self) -> &str {
        self.0.split(';').next().unwrap_or_default().trim()
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MimeType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let mut parts = s.split(';');
        let essence = parts.next().unwrap_or_default().trim();
        let (top, sub) = essence
            .split_once('/')
            .ok_or_else(|| "expected type/subtype".to_string())?;
        if !is_token(top) || !is_token(sub) {
            return Err("invalid type or subtype token".to_string());
        }
        for param in parts {
            let param = param.trim();
            if param.is_empty() {
                continue;
            }
            let (name, _) = param
                .split_once('=')
                .ok_or_else(|| format!("malformed parameter {param:?}"))?;
            if !is_token(name.trim()) {
                return Err(format!("malformed parameter {param:?}"));
            }
        }
        Ok(MimeType(s.to_ascii_lowercase()))
    }
}

/// Decodes a MIME type.
pub fn mime_type(field: &str, value: &str) -> Result<MimeType> {
    enumeration(field, value)
}

/// RFC 2045 token characters.
fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_alphanumeric()
                || matches!(
                    b,
                    b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^'
                        | b'_' | b'`' | b'|' | b'~'
                )
        })
}
