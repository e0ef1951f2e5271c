//! Standard link checks.

use std::sync::Arc;

use super::{Check, LinkAvailabilityChecker};
use crate::context::LinkScope;
use crate::document::LinkBinding;
use crate::world::{branch_qualified_target, transform_cross_repository_url};

/// Per-repository hygiene: link text and local targets.
pub struct RepositoryCheck;

impl Check for RepositoryCheck {
    fn name(&self) -> &'static str {
        "repository"
    }

    fn check(&self, binding: &LinkBinding, _scope: &LinkScope<'_>) -> Vec<String> {
        let mut findings = Vec::new();

        if binding.text().trim().is_empty() {
            findings.push(format!("link to `{}` has no text", binding.origin()));
        }

        let rooted = binding.rooted();
        if !rooted.is_uri() && !rooted.is_virtual() && !rooted.to_path_buf().exists() {
            findings.push(format!("`{rooted}` does not exist"));
        }

        findings
    }
}

/// Branch-qualified URLs into a known repository that stay external.
pub struct WorldCheck;

impl Check for WorldCheck {
    fn name(&self) -> &'static str {
        "world"
    }

    fn check(&self, binding: &LinkBinding, scope: &LinkScope<'_>) -> Vec<String> {
        let registry = scope.registry;
        let url = binding.rooted();
        let Some((repository, after_marker)) = branch_qualified_target(url, &registry.repositories)
        else {
            return Vec::new();
        };
        let resolved =
            transform_cross_repository_url(url, &registry.repositories, registry.branch_aware);
        if &resolved != url {
            return Vec::new();
        }

        let finding = if !registry.branch_aware {
            format!("`{url}` targets {} but branch resolution is disabled", repository.name)
        } else {
            match &repository.branch {
                Some(branch) => format!(
                    "`{url}` targets {} on another branch than `{branch}`, \
                     kept as an external link",
                    repository.name
                ),
                None => format!(
                    "`{url}` targets {} on `{}` but its checked-out branch is unknown",
                    repository.name,
                    after_marker.first_segment().unwrap_or_default()
                ),
            }
        };
        vec![finding]
    }
}

/// Reachability of external URLs.
pub struct AvailabilityCheck {
    checker: Arc<dyn LinkAvailabilityChecker>,
    skip_prefixes: Vec<String>,
}

impl AvailabilityCheck {
    pub fn new(checker: Arc<dyn LinkAvailabilityChecker>, skip_prefixes: Vec<String>) -> Self {
        Self {
            checker,
            skip_prefixes,
        }
    }
}

impl Check for AvailabilityCheck {
    fn name(&self) -> &'static str {
        "availability"
    }

    fn check(&self, binding: &LinkBinding, scope: &LinkScope<'_>) -> Vec<String> {
        let url = binding.rooted();
        if !matches!(url.root(), "http://" | "https://") {
            return Vec::new();
        }
        let registry = scope.registry;
        // resolved into the output tree, never followed on the web
        let resolved =
            transform_cross_repository_url(url, &registry.repositories, registry.branch_aware);
        if &resolved != url {
            return Vec::new();
        }
        let url = url.to_string();
        if self.skip_prefixes.iter().any(|p| url.starts_with(p.as_str())) {
            return Vec::new();
        }
        if self.checker.check_reachable(&url) {
            Vec::new()
        } else {
            vec![format!("`{url}` is not reachable")]
        }
    }
}
