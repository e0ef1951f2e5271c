//! `[check]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [check]
//! availability = true                      # HTTP reachability of external links
//! timeout = 10                             # Seconds per request
//! skip_prefixes = ["https://internal/"]    # Never fetched
//! level = "error"                          # Findings block the output
//! ```

use serde::Deserialize;

use crate::pipeline::CheckLevel;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckSection {
    pub availability: bool,

    /// Request timeout in seconds.
    pub timeout: u64,

    pub skip_prefixes: Vec<String>,

    pub level: CheckLevel,
}

impl Default for CheckSection {
    fn default() -> Self {
        Self {
            availability: false,
            timeout: 10,
            skip_prefixes: Vec::new(),
            level: CheckLevel::Warn,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;
    use crate::pipeline::CheckLevel;

    #[test]
    fn test_check_config() {
        let config =
            test_parse_config("[check]\navailability = true\ntimeout = 3\nlevel = \"error\"");
        assert!(config.check.availability);
        assert_eq!(config.check.timeout, 3);
        assert_eq!(config.check.level, CheckLevel::Error);
    }

    #[test]
    fn test_check_defaults() {
        let config = test_parse_config("");
        assert!(!config.check.availability);
        assert_eq!(config.check.timeout, 10);
        assert_eq!(config.check.level, CheckLevel::Warn);
    }
}
