// ABOUTME: Parser configuration: ParserOptions and the fluent ParserBuilder.
// ABOUTME: Module registry, per-container allow-lists and the date parser are fixed once built.

use std::collections::BTreeSet;

use crate::modules::{ModuleKind, ModuleRegistry};
use crate::parser::Parser;
use crate::time_parse::DateParser;

/// Everything a parse needs besides its input.
#[derive(Debug, Clone)]
pub struct ParserOptions {
    pub registry: ModuleRegistry,
    pub channel_modules: BTreeSet<ModuleKind>,
    pub item_modules: BTreeSet<ModuleKind>,
    pub dates: DateParser,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            registry: ModuleRegistry::standard(),
            channel_modules: BTreeSet::from([
                ModuleKind::CreativeCommons,
                ModuleKind::Syndication,
                ModuleKind::Itunes,
            ]),
            item_modules: BTreeSet::from([ModuleKind::CreativeCommons]),
            dates: DateParser::new(),
        }
    }
}

/// Builder for constructing Parser instances with custom configuration.
#[derive(Debug, Clone)]
pub struct ParserBuilder {
    opts: ParserOptions,
}

impl ParserBuilder {
    /// Create a new ParserBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: ParserOptions::default(),
        }
    }

    /// Replace the namespace registry.
    pub fn registry(mut self, registry: ModuleRegistry) -> Self {
        self.opts.registry = registry;
        self
    }

    /// Permit `kind` on `<channel>`.
    pub fn allow_channel_module(mut self, kind: ModuleKind) -> Self {
        self.opts.channel_modules.insert(kind);
        self
    }

    /// Permit `kind` on `<item>`.
    pub fn allow_item_module(mut self, kind: ModuleKind) -> Self {
        self.opts.item_modules.insert(kind);
        self
    }

    /// Replace the channel allow-list.
    pub fn channel_modules(mut self, kinds: impl IntoIterator<Item = ModuleKind>) -> Self {
        self.opts.channel_modules = kinds.into_iter().collect();
        self
    }

    /// Replace the item allow-list.
    pub fn item_modules(mut self, kinds: impl IntoIterator<Item = ModuleKind>) -> Self {
        self.opts.item_modules = kinds.into_iter().collect();
        self
    }

    /// Add a chrono format tried after the built-in date formats.
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.opts.dates = self.opts.dates.with_format(format);
        self
    }

    /// Turn unparseable dates into absent values instead of errors.
    pub fn lenient_dates(mut self, lenient: bool) -> Self {
        self.opts.dates = self.opts.dates.lenient(lenient);
        self
    }

    /// Build the Parser with the configured options.
    pub fn build(self) -> Parser {
        Parser::new(self.opts)
    }
}

impl Default for ParserBuilder {
    fn default() -> Self {
        Self::new()
    }
}
