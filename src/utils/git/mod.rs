//! Branch and remote detection for local repositories.

use std::path::Path;

use anyhow::{Context, Result};

/// Reads version-control state of a working tree.
pub trait GitInspector: Send + Sync {
    /// Short name of the checked-out branch, `None` on a detached head.
    fn current_branch(&self, root: &Path) -> Result<Option<String>>;

    /// Fetch URL of `origin`, normalized to `https`, `None` without one.
    fn remote_url(&self, root: &Path) -> Result<Option<String>>;
}

/// [`GitInspector`] backed by gix.
#[derive(Debug, Default, Clone, Copy)]
pub struct GixInspector;

impl GixInspector {
    fn open(root: &Path) -> Result<gix::Repository> {
        gix::discover(root).with_context(|| format!("no git repository at {}", root.display()))
    }
}

impl GitInspector for GixInspector {
    fn current_branch(&self, root: &Path) -> Result<Option<String>> {
        let repo = Self::open(root)?;
        let head = repo.head_name().context("failed to read HEAD")?;
        Ok(head.map(|name| name.shorten().to_string()))
    }

    fn remote_url(&self, root: &Path) -> Result<Option<String>> {
        let repo = Self::open(root)?;
        let Ok(remote) = repo.find_remote("origin") else {
            return Ok(None);
        };
        Ok(remote
            .url(gix::remote::Direction::Fetch)
            .map(|url| normalize_remote(&url.to_bstring().to_string())))
    }
}

/// Browser form of a clone URL.
///
/// `git@host:org/repo.git` and `ssh://git@host/org/repo.git` both become
/// `https://host/org/repo`.
pub fn normalize_remote(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    let url = url.strip_suffix(".git").unwrap_or(url);

    if let Some(rest) = url.strip_prefix("ssh://") {
        let rest = rest.split_once('@').map_or(rest, |(_, host)| host);
        return format!("https://{rest}");
    }
    if !url.contains("://")
        && let Some((user_host, path)) = url.split_once(':')
    {
        let host = user_host.split_once('@').map_or(user_host, |(_, host)| host);
        return format!("https://{host}/{path}");
    }
    url.replacen("http://", "https://", 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_remote() {
        assert_eq!(normalize_remote("git@github.com:Org/Repo.git"), "https://github.com/Org/Repo");
        assert_eq!(
            normalize_remote("ssh://git@gitlab.com/Org/Repo.git"),
            "https://gitlab.com/Org/Repo"
        );
        assert_eq!(normalize_remote("https://github.com/Org/Repo/"), "https://github.com/Org/Repo");
        assert_eq!(normalize_remote("http://example.com/x.git"), "https://example.com/x");
    }

    #[test]
    fn test_not_a_repository() {
        let dir = TempDir::new().unwrap();
        let inspector = GixInspector;
        // a temp dir may sit inside a checkout; only assert no panic and
        // a clean error when nothing is found
        if let Err(err) = inspector.current_branch(dir.path()) {
            assert!(err.to_string().contains("no git repository"));
        }
    }

    #[test]
    fn test_fresh_repository() {
        let dir = TempDir::new().unwrap();
        gix::init(dir.path()).unwrap();
        let inspector = GixInspector;
        assert_eq!(inspector.remote_url(dir.path()).unwrap(), None);
        let branch = inspector.current_branch(dir.path()).unwrap();
        assert!(branch.is_some_and(|b| !b.is_empty()));
    }
}
