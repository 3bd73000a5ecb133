// ABOUTME: Registry mapping namespace URIs to module kinds and builder factories.
// ABOUTME: Built once, handed to the parser by value; no global tables.

use std::collections::HashMap;
use std::fmt;

use crate::modules::{creative_commons, itunes, syndication, ModuleBuilder, ModuleKind};
use crate::time_parse::DateParser;

pub const SYNDICATION_NAMESPACE: &str = "http://purl.org/rss/1.0/modules/syndication/";
pub const CREATIVE_COMMONS_NAMESPACE: &str =
    "http://cyber.law.harvard.edu/rss/creativeCommonsRssModule.html";
pub const ITUNES_NAMESPACE: &str = "http://www.itunes.com/dtds/podcast-1.0.dtd";
/// Spelling used by Apple's own documentation for years.
pub const ITUNES_NAMESPACE_ALT: &str = "http://www.itunes.com/DTDs/Podcast-1.0.dtd";

/// Creates a fresh module builder for one container element.
pub type ModuleFactory = fn(&DateParser) -> Box<dyn ModuleBuilder>;

#[derive(Clone, Copy)]
pub struct ModuleEntry {
    kind: ModuleKind,
    factory: ModuleFactory,
}

impl fmt::Debug for ModuleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleEntry").field("kind", &self.kind).finish_non_exhaustive()
    }
}

impl ModuleEntry {
    pub fn kind(&self) -> ModuleKind {
        self.kind
    }

    pub fn create(&self, dates: &DateParser) -> Box<dyn ModuleBuilder> {
        (self.factory)(dates)
    }
}

/// Namespace URI → (module kind, builder factory).
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    entries: HashMap<String, ModuleEntry>,
}

impl ModuleRegistry {
    /// A registry that recognises no namespaces at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The namespaces this crate ships builders for.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register(
            SYNDICATION_NAMESPACE,
            ModuleKind::Syndication,
            syndication::factory,
        );
        registry.register(
            CREATIVE_COMMONS_NAMESPACE,
            ModuleKind::CreativeCommons,
            creative_commons::factory,
        );
        registry.register(ITUNES_NAMESPACE, ModuleKind::Itunes, itunes::factory);
        registry.register(ITUNES_NAMESPACE_ALT, ModuleKind::Itunes, itunes::factory);
        registry
    }

    /// Maps `uri` to a module kind, replacing any earlier mapping for it.
    pub fn register(&mut self, uri: impl Into<String>, kind: ModuleKind, factory: ModuleFactory) {
        self.entries.insert(uri.into(), ModuleEntry { kind, factory });
    }

    pub fn lookup(&self, uri: &str) -> Option<&ModuleEntry> {
        self.entries.get(uri)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_knows_the_shipped_namespaces() {
        let registry = ModuleRegistry::standard();
        assert_eq!(
            registry.lookup(SYNDICATION_NAMESPACE).map(ModuleEntry::kind),
            Some(ModuleKind::Syndication)
        );
        assert_eq!(
            registry.lookup(CREATIVE_COMMONS_NAMESPACE).map(ModuleEntry::kind),
            Some(ModuleKind::CreativeCommons)
        );
        assert_eq!(
            registry.lookup(ITUNES_NAMESPACE_ALT).map(ModuleEntry::kind),
            Some(ModuleKind::Itunes)
        );
        assert!(registry.lookup("http://example.com/unknown").is_none());
        assert!(ModuleRegistry::empty().is_empty());
    }

    #[test]
    fn register_adds_an_alias() {
        let mut registry = ModuleRegistry::standard();
        registry.register(
            "https://www.itunes.com/dtds/podcast-1.0.dtd",
            ModuleKind::Itunes,
            itunes::factory,
        );
        assert_eq!(
            registry
                .lookup("https://www.itunes.com/dtds/podcast-1.0.dtd")
                .map(ModuleEntry::kind),
            Some(ModuleKind::Itunes)
        );
    }
}
