//! Output writing: rendered documents, copied link targets, tables of contents.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Why [`Context::apply`](super::Context::apply) wrote nothing (or stopped).
#[derive(Debug, Error)]
pub enum EmitError {
    /// Some document is in error or failed to build. Nothing is written.
    #[error("refusing to write output, documents in error: {}", .documents.join(", "))]
    Refused { documents: Vec<String> },

    #[error("no output path set")]
    MissingOutput,

    /// A document has not been post-processed yet.
    #[error("document `{0}` has not been processed")]
    Unprocessed(String),

    #[error("failed to write `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What an apply wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitSummary {
    pub documents: usize,
    pub assets: usize,
    pub tables: usize,
}

/// Write `contents`, creating parent directories.
pub(super) fn write_file(path: &Path, contents: &str) -> Result<(), EmitError> {
    create_parent(path)?;
    fs::write(path, contents).map_err(|source| EmitError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Copy `from` to `to`, creating parent directories.
pub(super) fn copy_file(from: &Path, to: &Path) -> Result<(), EmitError> {
    create_parent(to)?;
    fs::copy(from, to).map(|_| ()).map_err(|source| EmitError::Io {
        path: to.to_path_buf(),
        source,
    })
}

fn create_parent(path: &Path) -> Result<(), EmitError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| EmitError::Io {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
