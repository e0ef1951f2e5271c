//! Repositories - documents sharing one local root and one remote.

mod reader;

pub use reader::{RepositoryReader, discover};

use std::collections::BTreeMap;
use std::fmt;

use crate::address::VirtualRoot;
use crate::core::{LinkError, PathValue};
use crate::document::Document;
use crate::world::WorldInfo;

/// Identity of a repository, as configured or detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryInfo {
    pub name: String,
    pub local_root: PathValue,
    /// Remote URL, empty when unknown.
    pub remote: PathValue,
    /// Checked-out branch; may span several segments (`feature/x`).
    pub branch: Option<PathValue>,
    pub version: Option<String>,
}

impl RepositoryInfo {
    pub fn new(name: impl Into<String>, local_root: PathValue) -> Self {
        Self {
            name: name.into(),
            local_root,
            remote: PathValue::empty(),
            branch: None,
            version: None,
        }
    }

    pub fn with_remote(mut self, remote: &str) -> Self {
        self.remote = PathValue::parse(remote);
        self
    }

    pub fn with_branch(mut self, branch: &str) -> Self {
        let branch = PathValue::parse(branch);
        self.branch = (!branch.is_empty()).then_some(branch);
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// A document that could not be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFailure {
    pub path: PathValue,
    pub message: String,
}

impl fmt::Display for DocumentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// A named collection of documents.
#[derive(Debug, Clone)]
pub struct Repository {
    info: RepositoryInfo,
    documents: BTreeMap<PathValue, Document>,
    failures: Vec<DocumentFailure>,
}

impl Repository {
    pub fn new(info: RepositoryInfo) -> Self {
        Self {
            info,
            documents: BTreeMap::new(),
            failures: Vec::new(),
        }
    }

    #[inline]
    pub fn info(&self) -> &RepositoryInfo {
        &self.info
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Add a document, keyed by its local path.
    pub fn insert(&mut self, document: Document) -> Option<Document> {
        self.documents.insert(document.local_path().clone(), document)
    }

    pub(crate) fn remove(&mut self, path: &PathValue) -> Option<Document> {
        self.documents.remove(path)
    }

    pub fn record_failure(&mut self, path: PathValue, error: impl fmt::Display) {
        self.failures.push(DocumentFailure {
            path,
            message: error.to_string(),
        });
    }

    #[inline]
    pub fn documents(&self) -> &BTreeMap<PathValue, Document> {
        &self.documents
    }

    pub(crate) fn documents_mut(&mut self) -> impl Iterator<Item = &mut Document> {
        self.documents.values_mut()
    }

    #[inline]
    pub fn failures(&self) -> &[DocumentFailure] {
        &self.failures
    }

    /// Any document in error or failed to build.
    pub fn is_error(&self) -> bool {
        !self.failures.is_empty() || self.documents.values().any(Document::is_error)
    }

    /// Read-only snapshot used while resolving links.
    pub fn entry(
        &self,
        world: &WorldInfo,
        root: &VirtualRoot,
    ) -> Result<RepositoryEntry, LinkError> {
        Ok(RepositoryEntry {
            world: world.clone(),
            name: self.info.name.clone(),
            local_root: self.info.local_root.clone(),
            remote: self.info.remote.clone(),
            branch: self.info.branch.clone(),
            address: root.attach(&self.info.local_root)?,
        })
    }
}

/// Snapshot of a registered repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryEntry {
    pub world: WorldInfo,
    pub name: String,
    pub local_root: PathValue,
    pub remote: PathValue,
    pub branch: Option<PathValue>,
    /// Virtual address of the local root.
    pub address: PathValue,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::MemoryTracer;
    use crate::markdown::{MarkdownEngine, PulldownEngine};

    fn info() -> RepositoryInfo {
        RepositoryInfo::new("Repo1", PathValue::parse("/in/Stack/Repo1"))
            .with_remote("https://github.com/Org/Repo1")
            .with_branch("feature/links")
    }

    #[test]
    fn test_info_builder() {
        let info = info();
        assert_eq!(info.branch, Some(PathValue::parse("feature/links")));
        assert_eq!(info.branch.as_ref().map(PathValue::len), Some(2));
        assert!(info.remote.is_uri());
        assert_eq!(info.clone().with_branch("").branch, None);
    }

    #[test]
    fn test_entry_address() {
        let repository = Repository::new(info());
        let roots = [
            PathValue::parse("/in/Stack/Repo1"),
            PathValue::parse("/in/Stack/Repo2"),
        ];
        let root = VirtualRoot::compute(&roots);
        let world = WorldInfo::new("CK", "1.0");
        let entry = repository.entry(&world, &root).unwrap();
        assert_eq!(entry.address, PathValue::parse("~/Repo1"));
        assert_eq!(entry.world, world);
    }

    #[test]
    fn test_failures_mark_error() {
        let tracer = MemoryTracer::new();
        let mut repository = Repository::new(info());
        let ast = PulldownEngine::default().parse("[a](b.md)");
        let path = PathValue::parse("/in/Stack/Repo1/README.md");
        repository.insert(Document::new(path.clone(), ast, &tracer).unwrap());
        assert!(!repository.is_error());

        repository.record_failure(path.append_segment("x.md"), LinkError::EmptyLink);
        assert!(repository.is_error());
        assert!(repository.failures()[0].to_string().contains("empty link"));
    }
}
