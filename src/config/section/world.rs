//! `[[world]]` sections.
//!
//! # Example
//!
//! ```toml
//! [[world]]
//! name = "CK"
//! version = "1.0"
//!
//! [[world.repository]]
//! path = "CK-Core"
//! remote = "https://github.com/Invenietis/CK-Core"
//! branch = "develop"     # overrides detection
//! version = "v1.2.0"
//! ```

use std::path::PathBuf;

use serde::Deserialize;

/// A named, versioned set of repositories.
#[derive(Debug, Clone, Deserialize)]
pub struct WorldSection {
    pub name: String,
    pub version: String,
    #[serde(default, rename = "repository")]
    pub repositories: Vec<RepositorySection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositorySection {
    /// Working tree, relative to the config file.
    pub path: PathBuf,
    /// Defaults to the last segment of `path`.
    pub name: Option<String>,
    pub remote: Option<String>,
    pub branch: Option<String>,
    pub version: Option<String>,
}

impl RepositorySection {
    /// Configured name, else the directory name.
    pub fn name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_world_sections() {
        let config = test_parse_config(
            r#"
[[world]]
name = "CK"
version = "2.0"

[[world.repository]]
path = "CK-Text"
remote = "https://github.com/Invenietis/CK-Text"
version = "v3.0.0"
"#,
        );
        assert_eq!(config.world.len(), 2);
        let world = &config.world[1];
        assert_eq!(world.version, "2.0");
        assert_eq!(world.repositories[0].name(), "CK-Text");
        assert_eq!(world.repositories[0].version.as_deref(), Some("v3.0.0"));
        assert!(world.repositories[0].branch.is_none());
    }
}
