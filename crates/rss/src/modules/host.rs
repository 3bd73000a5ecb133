// ABOUTME: Module dispatch for containers that accept foreign-namespace children.
// ABOUTME: Resolves namespace URIs, enforces the container's allow-list, and caches module builders.

use std::collections::{BTreeMap, BTreeSet};

use crate::cursor::{Cursor, StartTag};
use crate::error::{Result, RssError};
use crate::modules::{ModuleBuilder, ModuleKind, ModuleRegistry, Modules};
use crate::time_parse::DateParser;

/// The module-dispatch capability composed into the channel and item builders.
pub struct ModuleHost<'a> {
    container: &'static str,
    registry: &'a ModuleRegistry,
    allowed: &'a BTreeSet<ModuleKind>,
    dates: &'a DateParser,
    active: BTreeMap<ModuleKind, Box<dyn ModuleBuilder>>,
}

impl<'a> ModuleHost<'a> {
    pub fn new(
        container: &'static str,
        registry: &'a ModuleRegistry,
        allowed: &'a BTreeSet<ModuleKind>,
        dates: &'a DateParser,
    ) -> Self {
        Self {
            container,
            registry,
            allowed,
            dates,
            active: BTreeMap::new(),
        }
    }

    /// Routes one prefixed child element to its module builder.
    ///
    /// Elements from namespaces the registry doesn't know are skipped.
    /// A known module outside the allow-list is an error.
    pub fn dispatch(&mut self, cursor: &mut Cursor<'_>, element: &StartTag) -> Result<()> {
        let registry = self.registry;
        let Some(entry) = element.namespace().and_then(|ns| registry.lookup(ns)) else {
            tracing::debug!(
                container = self.container,
                tag = element.name(),
                namespace = element.namespace(),
                "skipping element from unrecognised namespace"
            );
            return cursor.skip_element(element);
        };

        let kind = entry.kind();
        if !self.allowed.contains(&kind) {
            return Err(RssError::ModuleNotPermitted {
                container: self.container.to_string(),
                module: kind,
            });
        }

        let container = self.container;
        let dates = self.dates;
        let builder = self.active.entry(kind).or_insert_with(|| {
            tracing::debug!(container, module = %kind, "starting module builder");
            entry.create(dates)
        });
        builder.consume(cursor, element)
    }

    /// Finishes every module builder this container started.
    pub fn finish(self) -> Result<Modules> {
        let mut modules = Modules::default();
        for builder in self.active.into_values() {
            modules.insert(builder.finish()?);
        }
        Ok(modules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::XmlEvent;
    use crate::modules::registry::{CREATIVE_COMMONS_NAMESPACE, SYNDICATION_NAMESPACE};

    fn open(cursor: &mut Cursor<'_>) -> StartTag {
        loop {
            if let XmlEvent::Start(tag) = cursor.next_event().unwrap() {
                return tag;
            }
        }
    }

    fn run(xml: &str, allowed: &[ModuleKind]) -> Result<Modules> {
        let registry = ModuleRegistry::standard();
        let allowed: BTreeSet<_> = allowed.iter().copied().collect();
        let dates = DateParser::new();
        let mut host = ModuleHost::new("item", &registry, &allowed, &dates);
        let mut cursor = Cursor::new(xml.as_bytes());
        let root = open(&mut cursor);
        cursor.children(&root, |cursor, child| host.dispatch(cursor, child))?;
        host.finish()
    }

    #[test]
    fn builder_persists_across_non_contiguous_tags() {
        let xml = format!(
            r#"<item xmlns:cc="{CREATIVE_COMMONS_NAMESPACE}" xmlns:x="http://example.com/x">
                <cc:license>http://creativecommons.org/licenses/by/4.0/</cc:license>
                <x:other>ignored</x:other>
                <cc:license>http://creativecommons.org/licenses/by-sa/4.0/</cc:license>
            </item>"#
        );
        let modules = run(&xml, &[ModuleKind::CreativeCommons]).unwrap();
        assert_eq!(modules.len(), 1);
        assert_eq!(modules.creative_commons().unwrap().licenses().len(), 2);
    }

    #[test]
    fn disallowed_module_is_rejected() {
        let xml = format!(
            r#"<item xmlns:sy="{SYNDICATION_NAMESPACE}"><sy:updatePeriod>hourly</sy:updatePeriod></item>"#
        );
        let err = run(&xml, &[ModuleKind::CreativeCommons]).unwrap_err();
        assert!(err.is_module_not_permitted());
    }

    #[test]
    fn unknown_namespaces_leave_no_trace() {
        let xml = r#"<item xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:creator>Ann</dc:creator><y:z/></item>"#;
        let modules = run(xml, &[]).unwrap();
        assert!(modules.is_empty());
    }
}
