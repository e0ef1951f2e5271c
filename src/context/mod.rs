//! Context - owner of every world and orchestrator of the pipeline.
//!
//! ```ignore
//! let mut context = Context::new(ContextOptions::default());
//! context.register(world, repository, tracer);
//! context.set_output(output);
//! context.process(&Pipeline::standard(options), tracer);
//! context.apply(&engine, tracer)?; // all or nothing
//! ```

mod emit;
mod registry;
mod report;

pub use emit::{EmitError, EmitSummary};
pub use registry::{LinkScope, Registry};
pub use report::Report;

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use rayon::prelude::*;

use crate::address::VirtualRoot;
use crate::core::PathValue;
use crate::document::{Document, LinkBinding, Stage};
use crate::generator::{page::render_page, toc::render_toc};
use crate::logger::Tracer;
use crate::markdown::MarkdownEngine;
use crate::pipeline::Pipeline;
use crate::repository::{Repository, RepositoryEntry};
use crate::utils::plural::Count;
use crate::world::{World, WorldInfo};

/// Resolution settings shared by every world.
#[derive(Debug, Clone)]
pub struct ContextOptions {
    /// Index document names tried for directory links, in order.
    pub index_files: Vec<String>,
    /// Resolve branch-qualified hosting URLs against checked-out branches.
    pub branch_aware: bool,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            index_files: vec!["README.md".to_string()],
            branch_aware: false,
        }
    }
}

pub struct Context {
    worlds: BTreeMap<WorldInfo, World>,
    virtual_root: VirtualRoot,
    output: Option<PathValue>,
    options: ContextOptions,
}

impl Context {
    pub fn new(options: ContextOptions) -> Self {
        Self {
            worlds: BTreeMap::new(),
            virtual_root: VirtualRoot::default(),
            output: None,
            options,
        }
    }

    // ------------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------------

    /// Add `repository` to `world`, creating the world if needed.
    ///
    /// When the virtual root moves, every document is attached again and
    /// goes back to [`Stage::Raw`].
    pub fn register(&mut self, world: WorldInfo, repository: Repository, tracer: &dyn Tracer) {
        let name = repository.name().to_string();
        self.worlds
            .entry(world.clone())
            .or_insert_with(|| World::new(world.clone()))
            .insert(repository);

        let root = VirtualRoot::compute(self.repositories().map(|r| &r.info().local_root));
        if root != self.virtual_root {
            tracer.debug(&format!("virtual root: {}", root.local()));
            self.virtual_root = root;
            for repository in self.worlds.values_mut().flat_map(World::repositories_mut) {
                attach_repository(repository, &self.virtual_root, tracer);
            }
        } else if let Some(repository) = self
            .worlds
            .get_mut(&world)
            .and_then(|w| w.repositories_mut().find(|r| r.name() == name))
        {
            attach_repository(repository, &self.virtual_root, tracer);
        }
    }

    /// Output directory. Must be set before [`Context::process`] to emit.
    pub fn set_output(&mut self, output: PathValue) {
        self.output = Some(output);
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    #[inline]
    pub fn output(&self) -> Option<&PathValue> {
        self.output.as_ref()
    }

    #[inline]
    pub fn virtual_root(&self) -> &VirtualRoot {
        &self.virtual_root
    }

    #[inline]
    pub fn options(&self) -> &ContextOptions {
        &self.options
    }

    #[inline]
    pub fn worlds(&self) -> &BTreeMap<WorldInfo, World> {
        &self.worlds
    }

    pub fn repositories(&self) -> impl Iterator<Item = &Repository> {
        self.worlds
            .values()
            .flat_map(|w| w.repositories().values())
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.repositories().flat_map(|r| r.documents().values())
    }

    /// True when no document is in error and none failed to build.
    pub fn is_ok(&self) -> bool {
        !self.worlds.values().any(World::is_error)
    }

    /// Snapshot for the pipeline.
    pub fn registry(&self) -> Registry {
        let repositories = self
            .worlds
            .values()
            .flat_map(|w| {
                w.repositories()
                    .values()
                    .filter_map(|r| r.entry(w.info(), &self.virtual_root).ok())
            })
            .collect();
        let documents = self
            .documents()
            .map(|d| d.current())
            .filter(|address| address.is_virtual())
            .cloned()
            .collect();
        Registry {
            virtual_root: self.virtual_root.clone(),
            repositories,
            documents,
            index_files: self.options.index_files.clone(),
            branch_aware: self.options.branch_aware,
        }
    }

    // ------------------------------------------------------------------------
    // Processing
    // ------------------------------------------------------------------------

    /// Resolve every link of every document still at [`Stage::Raw`].
    ///
    /// Each document runs the pipeline on its own rayon task. Post-processing
    /// starts only once all of them reached [`Stage::TargetDirectoryResolved`].
    pub fn process(&mut self, pipeline: &Pipeline, tracer: &dyn Tracer) {
        let registry = self.registry();
        let output = self.output.clone().unwrap_or_default();

        let mut tasks: Vec<(&RepositoryEntry, &mut Document)> = Vec::new();
        for world in self.worlds.values_mut() {
            let info = world.info().clone();
            for repository in world.repositories_mut() {
                let Some(entry) = registry.repository(&info, repository.name()) else {
                    continue;
                };
                tasks.extend(
                    repository
                        .documents_mut()
                        .filter(|d| d.stage() == Stage::Raw)
                        .map(|d| (entry, d)),
                );
            }
        }

        let _scope = tracer.open(&format!("resolving links of {}", Count(tasks.len(), "document")));
        tasks.par_iter_mut().for_each(|(entry, document)| {
            let address = document.current().clone();
            let scope = LinkScope {
                registry: &registry,
                repository: *entry,
                document: &address,
            };
            pipeline.run(document, &scope, tracer);
        });

        // barrier: every document is at TargetDirectoryResolved
        tasks
            .par_iter_mut()
            .for_each(|(_, document)| document.post_process(&output));
    }

    // ------------------------------------------------------------------------
    // Emission
    // ------------------------------------------------------------------------

    /// Local paths of every document in error or that failed to build.
    pub fn refused(&self) -> Vec<String> {
        self.repositories()
            .flat_map(|r| {
                r.failures().iter().map(|f| f.path.to_string()).chain(
                    r.documents()
                        .values()
                        .filter(|d| d.is_error())
                        .map(|d| d.local_path().to_string()),
                )
            })
            .collect()
    }

    /// Write every document, the local files they link to, and one table of
    /// contents per world.
    ///
    /// # Errors
    ///
    /// Nothing is written when any document is in error, when no output is
    /// set, or when a document was not processed for this output.
    pub fn apply(
        &mut self,
        engine: &dyn MarkdownEngine,
        tracer: &dyn Tracer,
    ) -> Result<EmitSummary, EmitError> {
        let output = self.output.clone().ok_or(EmitError::MissingOutput)?;
        let refused = self.refused();
        if !refused.is_empty() {
            return Err(EmitError::Refused { documents: refused });
        }
        if let Some(document) = self
            .documents()
            .find(|d| d.stage() != Stage::PostProcessed || !d.current().starts_with(&output))
        {
            return Err(EmitError::Unprocessed(document.local_path().to_string()));
        }

        let _scope = tracer.open(&format!("writing output to {output}"));
        let mut summary = EmitSummary::default();
        let mut assets = BTreeSet::new();

        for repository in self.worlds.values_mut().flat_map(World::repositories_mut) {
            for document in repository.documents_mut() {
                document.apply()?;
                let html = render_page(&document.title(), &engine.render(document.ast()));
                emit::write_file(&document.current().to_path_buf(), &html)?;
                summary.documents += 1;
                assets.extend(linked_files(document, &self.virtual_root, &output));
            }
        }

        for (from, to) in &assets {
            tracer.debug(&format!("copy {}", from.display()));
            emit::copy_file(from, to)?;
            summary.assets += 1;
        }

        for world in self.worlds.values() {
            let path = output.to_path_buf().join(world.info().toc_file_name());
            emit::write_file(&path, &render_toc(world, &output))?;
            summary.tables += 1;
        }

        tracer.info(&format!(
            "wrote {}, {}, {}",
            Count(summary.documents, "document"),
            Count(summary.assets, "file"),
            Count(summary.tables, "table of contents"),
        ));
        Ok(summary)
    }
}

/// Attach every document of `repository`; documents outside `root` are dropped
/// and recorded as failures.
fn attach_repository(repository: &mut Repository, root: &VirtualRoot, tracer: &dyn Tracer) {
    let failed: Vec<_> = repository
        .documents_mut()
        .filter_map(|d| d.attach(root).err().map(|err| (d.local_path().clone(), err)))
        .collect();
    for (path, err) in failed {
        tracer.error(&format!("{path}: {err}"));
        repository.remove(&path);
        repository.record_failure(path, err);
    }
}

/// Local non-markdown files linked from `document`, with their destination.
///
/// Sources come from the resolved virtual targets, so files reached through
/// a hosting URL of a registered repository are copied too.
fn linked_files(
    document: &Document,
    root: &VirtualRoot,
    output: &PathValue,
) -> Vec<(PathBuf, PathBuf)> {
    document
        .bindings()
        .iter()
        .filter_map(LinkBinding::resolved)
        .filter(|address| !address.has_extension("md"))
        .filter_map(|address| {
            let from = root.to_local(address).ok()?.to_path_buf();
            if !from.is_file() {
                return None;
            }
            let to = output.combine(&address.remove_first_segments(0)).to_path_buf();
            Some((from, to))
        })
        .collect()
}
