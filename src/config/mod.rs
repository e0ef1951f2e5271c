//! Configuration for `docstack.toml`.
//!
//! # Sections
//!
//! | Section              | Purpose                                        |
//! |----------------------|------------------------------------------------|
//! | `[build]`            | Output directory, index files, excluded dirs   |
//! | `[git]`              | Branch detection and branch-aware URLs         |
//! | `[check]`            | Reachability checks and check level            |
//! | `[[world]]`          | Worlds and their `[[world.repository]]` list   |

mod error;
pub mod section;
mod util;

pub use error::ConfigError;
pub use section::{BuildSection, CheckSection, GitSection, RepositorySection, WorldSection};
pub use util::find_config_file;

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::log;
use util::resolve_path;

/// Root configuration structure representing docstack.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocstackConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory of the config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub build: BuildSection,

    #[serde(default)]
    pub git: GitSection,

    #[serde(default)]
    pub check: CheckSection,

    #[serde(default)]
    pub world: Vec<WorldSection>,
}

impl DocstackConfig {
    /// Load, resolve and validate the configuration at `path`.
    ///
    /// Unknown keys are reported and ignored.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (mut config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        config.config_path = path.to_path_buf();
        let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        config.finalize(&root);
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        log!("warn"; "unknown fields in {}, ignoring:", path.display());
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// Resolve every path against `root`.
    fn finalize(&mut self, root: &Path) {
        self.root = root.to_path_buf();
        self.build.output = resolve_path(&self.build.output, root);
        for repository in self.world.iter_mut().flat_map(|w| w.repositories.iter_mut()) {
            repository.path = resolve_path(&repository.path, root);
        }
    }

    /// At least one world, each with uniquely named, existing repositories.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.is_empty() {
            return Err(ConfigError::Validation("no [[world]] configured".into()));
        }
        for world in &self.world {
            if world.repositories.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "world `{} {}` has no repository",
                    world.name, world.version
                )));
            }
            let mut names = BTreeSet::new();
            for repository in &world.repositories {
                let name = repository.name();
                if !names.insert(name.clone()) {
                    return Err(ConfigError::Validation(format!(
                        "repository `{name}` appears twice in world `{} {}`",
                        world.name, world.version
                    )));
                }
                if !repository.path.is_dir() {
                    return Err(ConfigError::Validation(format!(
                        "repository `{name}`: `{}` is not a directory",
                        repository.path.display()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Override with command-line values.
    pub fn apply_overrides(
        &mut self,
        output: Option<&Path>,
        git: bool,
        check_links: bool,
        clean: bool,
    ) {
        if let Some(output) = output {
            let cwd = std::env::current_dir().unwrap_or_default();
            self.build.output = resolve_path(output, &cwd);
        }
        self.git.enable |= git;
        self.check.availability |= check_links;
        self.build.clean |= clean;
    }
}

#[cfg(test)]
pub fn test_parse_config(extra: &str) -> DocstackConfig {
    let config = format!(
        "[[world]]\nname = \"CK\"\nversion = \"1.0\"\n\n\
         [[world.repository]]\npath = \"CK-Core\"\n\n{extra}"
    );
    let (parsed, ignored) = DocstackConfig::parse_with_ignored(&config).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}
