//! Sections of `docstack.toml`.

mod build;
mod check;
mod world;

pub use build::BuildSection;
pub use check::CheckSection;
pub use world::{RepositorySection, WorldSection};

use serde::Deserialize;

/// `[git]` section.
///
/// ```toml
/// [git]
/// enable = true    # detect branches and resolve branch-qualified URLs
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GitSection {
    pub enable: bool,
}
