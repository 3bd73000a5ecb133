// ABOUTME: Streaming RSS 2.0 parser producing immutable, validated documents.
// ABOUTME: Provides element builders, namespaced module dispatch, date/duration parsing, and the Parser.

pub mod builder;
pub mod category;
pub mod channel;
pub mod cloud;
pub mod cursor;
pub mod decode;
pub mod duration_parse;
pub mod enclosure;
pub mod error;
pub mod guid;
pub mod image;
pub mod item;
pub mod modules;
pub mod options;
pub mod parser;
pub mod source;
pub mod time_parse;

pub use category::Category;
pub use channel::{Channel, Day};
pub use cloud::{Cloud, CloudProtocol};
pub use decode::MimeType;
pub use duration_parse::parse_duration;
pub use enclosure::Enclosure;
pub use error::{ErrorKind, Result, RssError};
pub use guid::Guid;
pub use image::{Image, TextInput};
pub use item::Item;
pub use modules::{
    CreativeCommons, Explicit, Itunes, ItunesCategory, ItunesOwner, Module, ModuleKind,
    ModuleRegistry, Modules, ShowType, Syndication, UpdatePeriod,
};
pub use options::{ParserBuilder, ParserOptions};
pub use parser::{parse, Document, Parser, Version};
pub use source::Source;
pub use time_parse::DateParser;
