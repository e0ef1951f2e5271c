//! Standard link transforms.

use super::Transform;
use crate::context::LinkScope;
use crate::core::{LinkError, PathValue, RootKind};
use crate::document::transform_target_directory;
use crate::world::transform_cross_repository_url;

/// Absolute local paths inside the owning repository.
pub struct RepositoryLocalTransform;

impl Transform for RepositoryLocalTransform {
    fn name(&self) -> &'static str {
        "repository-local"
    }

    fn transform(
        &self,
        current: &PathValue,
        scope: &LinkScope<'_>,
    ) -> Result<PathValue, LinkError> {
        let local = matches!(
            current.kind(),
            RootKind::RootedBySeparator
                | RootKind::RootedByDoubleSeparator
                | RootKind::RootedByFirstPart
        );
        if !local {
            return Ok(current.clone());
        }
        let repository = scope.repository;
        Ok(match current.strip_prefix(&repository.local_root) {
            Some(rest) => repository.address.combine(&rest),
            None => current.clone(),
        })
    }
}

/// Links into any repository of any world.
pub struct CrossRepositoryTransform;

impl Transform for CrossRepositoryTransform {
    fn name(&self) -> &'static str {
        "cross-repository"
    }

    fn transform(
        &self,
        current: &PathValue,
        scope: &LinkScope<'_>,
    ) -> Result<PathValue, LinkError> {
        let registry = scope.registry;
        Ok(transform_cross_repository_url(
            current,
            &registry.repositories,
            registry.branch_aware,
        ))
    }
}

/// Directory links to their index document.
pub struct TargetDirectoryTransform;

impl Transform for TargetDirectoryTransform {
    fn name(&self) -> &'static str {
        "target-directory"
    }

    fn transform(
        &self,
        current: &PathValue,
        scope: &LinkScope<'_>,
    ) -> Result<PathValue, LinkError> {
        let registry = scope.registry;
        transform_target_directory(current, &registry.documents, &registry.index_files)
    }
}
