//! Read-only snapshot shared by every pipeline task.

use rustc_hash::FxHashSet;

use crate::address::VirtualRoot;
use crate::core::PathValue;
use crate::repository::RepositoryEntry;
use crate::world::WorldInfo;

/// Everything a check or transform may look up besides its own document.
///
/// Taken once before the per-document fan-out and never mutated during it.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    pub virtual_root: VirtualRoot,
    /// Every repository of every world, in world then name order.
    pub repositories: Vec<RepositoryEntry>,
    /// Virtual addresses of every document.
    pub documents: FxHashSet<PathValue>,
    /// Index document names tried for directory links, in order.
    pub index_files: Vec<String>,
    /// Resolve branch-qualified hosting URLs.
    pub branch_aware: bool,
}

impl Registry {
    pub fn repository(&self, world: &WorldInfo, name: &str) -> Option<&RepositoryEntry> {
        self.repositories
            .iter()
            .find(|r| &r.world == world && r.name == name)
    }
}

/// Lookup scope of one document while its links are processed.
#[derive(Debug, Clone, Copy)]
pub struct LinkScope<'a> {
    pub registry: &'a Registry,
    /// Repository owning the document.
    pub repository: &'a RepositoryEntry,
    /// Virtual address of the document.
    pub document: &'a PathValue,
}
