//! Worlds - named, versioned sets of repositories released together.

mod cross;

pub use cross::{branch_qualified_target, transform_cross_repository_url};

use std::collections::BTreeMap;
use std::fmt;

use crate::document::Document;
use crate::repository::Repository;

/// Identity of a world. Same name with another version is another world.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorldInfo {
    pub name: String,
    pub version: String,
}

impl WorldInfo {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// File name of the world's table of contents.
    pub fn toc_file_name(&self) -> String {
        format!("{}-{}.toc.html", self.name, self.version)
    }
}

impl fmt::Display for WorldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

#[derive(Debug, Clone)]
pub struct World {
    info: WorldInfo,
    repositories: BTreeMap<String, Repository>,
}

impl World {
    pub fn new(info: WorldInfo) -> Self {
        Self {
            info,
            repositories: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn info(&self) -> &WorldInfo {
        &self.info
    }

    /// Add a repository, replacing any repository of the same name.
    pub fn insert(&mut self, repository: Repository) -> Option<Repository> {
        self.repositories
            .insert(repository.name().to_string(), repository)
    }

    #[inline]
    pub fn repositories(&self) -> &BTreeMap<String, Repository> {
        &self.repositories
    }

    pub(crate) fn repositories_mut(&mut self) -> impl Iterator<Item = &mut Repository> {
        self.repositories.values_mut()
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.repositories
            .values()
            .flat_map(|r| r.documents().values())
    }

    pub fn is_error(&self) -> bool {
        self.repositories.values().any(Repository::is_error)
    }
}
