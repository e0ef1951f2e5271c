//! Markdown discovery and parsing for one repository.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jwalk::WalkDir;
use rayon::prelude::*;

use super::{Repository, RepositoryInfo};
use crate::core::PathValue;
use crate::document::Document;
use crate::logger::Tracer;
use crate::markdown::MarkdownEngine;
use crate::utils::plural::plural_count;

/// Collect every `*.md` file under `root`, sorted.
///
/// Hidden entries and directories named in `exclude` are skipped.
pub fn discover(root: &Path, exclude: &[String]) -> Vec<PathBuf> {
    let exclude = exclude.to_vec();
    let mut files: Vec<_> = WalkDir::new(root)
        .skip_hidden(true)
        .process_read_dir(move |_, _, _, children| {
            children.retain(|entry| {
                entry.as_ref().map_or(true, |e| {
                    !(e.file_type().is_dir()
                        && exclude.iter().any(|x| e.file_name().to_str() == Some(x.as_str())))
                })
            });
        })
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|p| is_markdown_file(p))
        .collect();
    files.sort();
    files
}

fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("md"))
}

/// Builds a [`Repository`] from its local checkout.
pub struct RepositoryReader<'a> {
    engine: &'a dyn MarkdownEngine,
    tracer: &'a dyn Tracer,
    exclude: &'a [String],
}

impl<'a> RepositoryReader<'a> {
    pub fn new(
        engine: &'a dyn MarkdownEngine,
        tracer: &'a dyn Tracer,
        exclude: &'a [String],
    ) -> Self {
        Self {
            engine,
            tracer,
            exclude,
        }
    }

    /// Read every markdown file of the repository.
    ///
    /// A document that fails to build is recorded on the repository; the
    /// others are still read.
    pub fn read(&self, info: RepositoryInfo) -> Repository {
        let _scope = self.tracer.open(&format!("reading repository {}", info.name));
        let files = discover(&info.local_root.to_path_buf(), self.exclude);

        let results: Vec<_> = files
            .par_iter()
            .map(|file| (PathValue::from_path(file), self.read_document(file)))
            .collect();

        let mut repository = Repository::new(info);
        for (path, result) in results {
            match result {
                Ok(document) => {
                    repository.insert(document);
                }
                Err(err) => {
                    self.tracer.error(&format!("{path}: {err:#}"));
                    repository.record_failure(path, format!("{err:#}"));
                }
            }
        }

        self.tracer.debug(&format!(
            "{}: {}",
            repository.name(),
            plural_count(repository.documents().len(), "document")
        ));
        repository
    }

    fn read_document(&self, file: &Path) -> Result<Document> {
        let text = fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        let ast = self.engine.parse(&text);
        Ok(Document::new(PathValue::from_path(file), ast, self.tracer)?)
    }
}
