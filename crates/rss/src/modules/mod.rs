// ABOUTME: Namespaced extension modules layered on channels and items.
// ABOUTME: Defines module kinds, the module value enum, and the module builder contract.

pub mod creative_commons;
pub mod host;
pub mod itunes;
pub mod registry;
pub mod syndication;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::cursor::{Cursor, StartTag};
use crate::error::Result;

pub use creative_commons::CreativeCommons;
pub use host::ModuleHost;
pub use itunes::{Explicit, Itunes, ItunesCategory, ItunesOwner, ShowType};
pub use registry::{ModuleEntry, ModuleFactory, ModuleRegistry};
pub use syndication::{Syndication, UpdatePeriod};

/// The extension formats this crate knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ModuleKind {
    CreativeCommons,
    Syndication,
    Itunes,
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ModuleKind::CreativeCommons => "creativeCommons",
            ModuleKind::Syndication => "syndication",
            ModuleKind::Itunes => "itunes",
        };
        write!(f, "{}", s)
    }
}

/// The payload one module contributed to its container.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Module {
    CreativeCommons(CreativeCommons),
    Syndication(Syndication),
    Itunes(Itunes),
}

impl Module {
    pub fn kind(&self) -> ModuleKind {
        match self {
            Module::CreativeCommons(_) => ModuleKind::CreativeCommons,
            Module::Syndication(_) => ModuleKind::Syndication,
            Module::Itunes(_) => ModuleKind::Itunes,
        }
    }
}

/// Accumulates one module's fields across the container's foreign children.
///
/// The host hands every child element from the module's namespace to the
/// same builder, so a module may span several non-contiguous tags.
pub trait ModuleBuilder {
    /// Reads one foreign element through its end tag.
    fn consume(&mut self, cursor: &mut Cursor<'_>, element: &StartTag) -> Result<()>;

    /// Validates the module's own required fields.
    fn finish(self: Box<Self>) -> Result<Module>;
}

/// The modules attached to one channel or item, at most one per kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Modules(BTreeMap<ModuleKind, Module>);

impl Modules {
    pub fn get(&self, kind: ModuleKind) -> Option<&Module> {
        self.0.get(&kind)
    }

    pub fn creative_commons(&self) -> Option<&CreativeCommons> {
        match self.get(ModuleKind::CreativeCommons) {
            Some(Module::CreativeCommons(m)) => Some(m),
            _ => None,
        }
    }

    pub fn syndication(&self) -> Option<&Syndication> {
        match self.get(ModuleKind::Syndication) {
            Some(Module::Syndication(m)) => Some(m),
            _ => None,
        }
    }

    pub fn itunes(&self) -> Option<&Itunes> {
        match self.get(ModuleKind::Itunes) {
            Some(Module::Itunes(m)) => Some(m),
            _ => None,
        }
    }

    pub fn kinds(&self) -> impl Iterator<Item = ModuleKind> + '_ {
        self.0.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn insert(&mut self, module: Module) {
        self.0.insert(module.kind(), module);
    }
}
