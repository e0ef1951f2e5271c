//! Cross-repository link resolution.

use url::Url;

use crate::core::PathValue;
use crate::repository::RepositoryEntry;

/// Hosting platforms with branch-qualified URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Host {
    GitHub,
    GitLab,
    Other,
}

impl Host {
    fn of(link: &PathValue) -> Self {
        let host = Url::parse(&link.to_string())
            .ok()
            .and_then(|url| url.host_str().map(str::to_ascii_lowercase));
        match host.as_deref() {
            Some("github.com" | "www.github.com") => Self::GitHub,
            Some("gitlab.com" | "www.gitlab.com") => Self::GitLab,
            _ => Self::Other,
        }
    }

    /// Number of marker segments before the branch, if `rest` starts with one.
    ///
    /// `tree|blob` on GitHub, `-/tree|-/blob` on GitLab.
    fn marker_len(self, rest: &PathValue) -> Option<usize> {
        let segments = rest.segments();
        let is_marker = |s: &String| s == "tree" || s == "blob";
        match self {
            Self::GitHub => segments.first().filter(|s| is_marker(s)).map(|_| 1),
            Self::GitLab => {
                (segments.len() >= 2 && segments[0] == "-" && is_marker(&segments[1])).then_some(2)
            }
            Self::Other => None,
        }
    }
}

/// Express `link` under the virtual address of the repository it targets.
///
/// Local paths match a repository's local root, URLs its remote. A
/// branch-qualified URL only matches a repository whose checked-out branch is
/// the one in the URL; with `branch_aware` off such URLs are left alone.
/// Virtual and relative links, and links matching no repository, are returned
/// unchanged, so applying the transform twice changes nothing.
pub fn transform_cross_repository_url(
    link: &PathValue,
    repositories: &[RepositoryEntry],
    branch_aware: bool,
) -> PathValue {
    if link.is_virtual() || link.is_relative() {
        return link.clone();
    }

    let is_uri = link.is_uri();
    let host = if is_uri { Host::of(link) } else { Host::Other };

    for repository in repositories {
        let scope = if is_uri {
            &repository.remote
        } else {
            &repository.local_root
        };
        if scope.is_empty() {
            continue;
        }
        let Some(mut rest) = link.strip_prefix(scope) else {
            continue;
        };

        if let Some(marker) = host.marker_len(&rest) {
            if !branch_aware {
                return link.clone();
            }
            let Some(branch) = &repository.branch else {
                continue;
            };
            let after = rest.remove_first_segments(marker);
            if !after.starts_with(branch) {
                continue;
            }
            rest = after.remove_first_segments(branch.len());
        }

        return repository.address.combine(&rest);
    }

    link.clone()
}

/// First repository whose remote prefixes `link` followed by a branch marker.
///
/// Returns the repository and the segments after the marker, branch first.
pub fn branch_qualified_target<'a>(
    link: &PathValue,
    repositories: &'a [RepositoryEntry],
) -> Option<(&'a RepositoryEntry, PathValue)> {
    if !link.is_uri() {
        return None;
    }
    let host = Host::of(link);
    repositories.iter().find_map(|repository| {
        if repository.remote.is_empty() {
            return None;
        }
        let rest = link.strip_prefix(&repository.remote)?;
        let marker = host.marker_len(&rest)?;
        Some((repository, rest.remove_first_segments(marker)))
    })
}
