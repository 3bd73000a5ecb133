// ABOUTME: Error types for RSS document parsing.
// ABOUTME: Provides the RssError enum and the ErrorKind categories callers match on.

use std::fmt;
use thiserror::Error;

use crate::modules::ModuleKind;

/// Categories of parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Structural,
    Io,
    DuplicateField,
    Decode,
    Invariant,
    ModuleNotPermitted,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Structural => "structural error",
            ErrorKind::Io => "I/O error",
            ErrorKind::DuplicateField => "duplicate field",
            ErrorKind::Decode => "decode error",
            ErrorKind::Invariant => "invariant violation",
            ErrorKind::ModuleNotPermitted => "module not permitted",
        };
        write!(f, "{}", s)
    }
}

/// Errors that can occur while parsing an RSS document.
///
/// Every failure aborts the whole parse; no partial document is produced.
#[derive(Debug, Error)]
pub enum RssError {
    /// The tokenizer rejected the input, or the underlying read failed.
    #[error("{}", describe_xml(.0))]
    Xml(#[from] quick_xml::Error),

    /// Text or attribute bytes could not be decoded.
    #[error("malformed XML: {0}")]
    Malformed(String),

    /// A required structural element was not where it had to be.
    #[error("<{0}> not found")]
    MissingElement(&'static str),

    /// The stream ended while an element was still open.
    #[error("unexpected end of document inside <{0}>")]
    UnexpectedEof(String),

    /// A single-valued tag appeared twice inside one element.
    #[error("duplicate <{field}> in <{element}>")]
    DuplicateField { element: String, field: String },

    /// A field's text failed primitive decoding.
    #[error("invalid value {value:?} for <{field}>: {reason}")]
    Decode {
        field: String,
        value: String,
        reason: String,
    },

    /// An entity could not be constructed from the accumulated fields.
    #[error("invalid <{entity}>: {message}")]
    Invariant { entity: String, message: String },

    /// A recognised module appeared in a container that does not allow it.
    #[error("module {module} is not permitted in <{container}>")]
    ModuleNotPermitted {
        container: String,
        module: ModuleKind,
    },
}

impl RssError {
    /// Creates a Malformed error from any displayable decoding failure.
    pub fn malformed(err: impl fmt::Display) -> Self {
        RssError::Malformed(err.to_string())
    }

    /// Creates a DuplicateField error.
    pub fn duplicate(element: impl Into<String>, field: impl Into<String>) -> Self {
        RssError::DuplicateField {
            element: element.into(),
            field: field.into(),
        }
    }

    /// Creates a Decode error for `value` found in `field`.
    pub fn decode(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl fmt::Display,
    ) -> Self {
        RssError::Decode {
            field: field.into(),
            value: value.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates an Invariant error for `entity`.
    pub fn invariant(entity: impl Into<String>, message: impl Into<String>) -> Self {
        RssError::Invariant {
            entity: entity.into(),
            message: message.into(),
        }
    }

    /// Creates an Invariant error for a required field that never appeared.
    pub fn missing_field(entity: impl Into<String>, field: &str) -> Self {
        Self::invariant(entity, format!("missing required field <{}>", field))
    }

    /// Returns the failure category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RssError::Xml(quick_xml::Error::Io(_)) => ErrorKind::Io,
            RssError::Xml(_)
            | RssError::Malformed(_)
            | RssError::MissingElement(_)
            | RssError::UnexpectedEof(_) => ErrorKind::Structural,
            RssError::DuplicateField { .. } => ErrorKind::DuplicateField,
            RssError::Decode { .. } => ErrorKind::Decode,
            RssError::Invariant { .. } => ErrorKind::Invariant,
            RssError::ModuleNotPermitted { .. } => ErrorKind::ModuleNotPermitted,
        }
    }

    /// Returns true if this is a Structural error.
    pub fn is_structural(&self) -> bool {
        self.kind() == ErrorKind::Structural
    }

    /// Returns true if the underlying read failed.
    pub fn is_io(&self) -> bool {
        self.kind() == ErrorKind::Io
    }

    /// Returns true if this is a DuplicateField error.
    pub fn is_duplicate_field(&self) -> bool {
        self.kind() == ErrorKind::DuplicateField
    }

    /// Returns true if this is a Decode error.
    pub fn is_decode(&self) -> bool {
        self.kind() == ErrorKind::Decode
    }

    /// Returns true if this is an Invariant error.
    pub fn is_invariant(&self) -> bool {
        self.kind() == ErrorKind::Invariant
    }

    /// Returns true if this is a ModuleNotPermitted error.
    pub fn is_module_not_permitted(&self) -> bool {
        self.kind() == ErrorKind::ModuleNotPermitted
    }
}

pub type Result<T, E = RssError> = std::result::Result<T, E>;

fn describe_xml(err: &quick_xml::Error) -> String {
    match err {
        quick_xml::Error::Io(io) => format!("read failed: {io}"),
        other => format!("malformed XML: {other}"),
    }
}
