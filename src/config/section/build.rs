//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! output = "_site"                 # Output directory
//! clean = false                    # Remove output before writing
//! index_files = ["README.md"]      # Tried in order for directory links
//! exclude = ["node_modules"]       # Directory names never scanned
//! ```

use std::path::PathBuf;

use serde::Deserialize;

/// Output and discovery settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    /// Output directory, relative to the config file.
    pub output: PathBuf,

    /// Remove the output directory before writing.
    pub clean: bool,

    /// Index document names for directory links.
    pub index_files: Vec<String>,

    /// Directory names skipped while discovering documents.
    pub exclude: Vec<String>,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            output: PathBuf::from("_site"),
            clean: false,
            index_files: vec!["README.md".to_string()],
            exclude: ["node_modules", "bin", "obj", "target"]
                .map(String::from)
                .to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_build_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.build.output.file_name().unwrap(), "_site");
        assert_eq!(config.build.index_files, ["README.md"]);
        assert!(config.build.exclude.contains(&"node_modules".to_string()));
        assert!(!config.build.clean);
    }

    #[test]
    fn test_build_override() {
        let config =
            test_parse_config("[build]\nclean = true\nindex_files = [\"index.md\", \"README.md\"]");
        assert!(config.build.clean);
        assert_eq!(config.build.index_files, ["index.md", "README.md"]);
    }
}
