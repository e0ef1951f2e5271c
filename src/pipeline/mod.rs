//! Link processing pipeline.
//!
//! Moves one document from [`Stage::Raw`] to [`Stage::TargetDirectoryResolved`].
//! Post-processing runs separately, after every document got there.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │              Per document (rayon fan-out, no locks)           │
//! │  Raw -> Checked -> RepoTransformed -> WorldTransformed         │
//! │      -> TargetDirectoryResolved                               │
//! └───────────────────────────────────────────────────────────────┘
//!                     global barrier (all documents)
//! ┌───────────────────────────────────────────────────────────────┐
//! │  PostProcessed (rayon)  ->  Applied (sequential, all or none) │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! - [`Check`]s read bindings and report findings, never touching `current`
//! - [`Transform`]s thread `current` through an ordered list, one list per stage

pub mod availability;
mod checks;
mod transforms;

use std::sync::Arc;

use serde::Deserialize;

use crate::context::LinkScope;
use crate::core::{LinkError, PathValue};
use crate::document::{Document, LinkBinding, Stage};
use crate::logger::Tracer;

pub use availability::{HttpChecker, LinkAvailabilityChecker};
pub use checks::{AvailabilityCheck, RepositoryCheck, WorldCheck};
pub use transforms::{CrossRepositoryTransform, RepositoryLocalTransform, TargetDirectoryTransform};

// =============================================================================
// Capabilities
// =============================================================================

/// A read-only inspection of one link.
pub trait Check: Send + Sync {
    fn name(&self) -> &'static str;

    /// Findings about `binding`, empty when it is fine.
    fn check(&self, binding: &LinkBinding, scope: &LinkScope<'_>) -> Vec<String>;
}

/// One step of link resolution.
pub trait Transform: Send + Sync {
    fn name(&self) -> &'static str;

    /// Code links are left alone unless a transform says otherwise.
    fn applies_to(&self, binding: &LinkBinding) -> bool {
        !binding.link_type().is_code()
    }

    fn transform(
        &self,
        current: &PathValue,
        scope: &LinkScope<'_>,
    ) -> Result<PathValue, LinkError>;
}

/// How check findings are recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckLevel {
    /// Findings are infos.
    #[default]
    Warn,
    /// Findings are errors and block the output.
    Error,
}

// =============================================================================
// Pipeline
// =============================================================================

/// Ordered checks and transforms, registered per stage.
#[derive(Default)]
pub struct Pipeline {
    check_level: CheckLevel,
    checks: Vec<Box<dyn Check>>,
    repository: Vec<Box<dyn Transform>>,
    world: Vec<Box<dyn Transform>>,
    directory: Vec<Box<dyn Transform>>,
}

/// Inputs of [`Pipeline::standard`].
#[derive(Default, Clone)]
pub struct PipelineOptions {
    pub check_level: CheckLevel,
    /// Reachability checker, `None` disables the check.
    pub availability: Option<Arc<dyn LinkAvailabilityChecker>>,
    /// URL prefixes never checked for reachability.
    pub skip_prefixes: Vec<String>,
}

impl Pipeline {
    pub fn new(check_level: CheckLevel) -> Self {
        Self {
            check_level,
            ..Self::default()
        }
    }

    /// The standard checks and transforms.
    pub fn standard(options: PipelineOptions) -> Self {
        let mut pipeline = Self::new(options.check_level)
            .with_check(RepositoryCheck)
            .with_check(WorldCheck)
            .with_repository_transform(RepositoryLocalTransform)
            .with_world_transform(CrossRepositoryTransform)
            .with_directory_transform(TargetDirectoryTransform);
        if let Some(checker) = options.availability {
            pipeline = pipeline.with_check(AvailabilityCheck::new(checker, options.skip_prefixes));
        }
        pipeline
    }

    pub fn with_check(mut self, check: impl Check + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    pub fn with_repository_transform(mut self, transform: impl Transform + 'static) -> Self {
        self.repository.push(Box::new(transform));
        self
    }

    pub fn with_world_transform(mut self, transform: impl Transform + 'static) -> Self {
        self.world.push(Box::new(transform));
        self
    }

    pub fn with_directory_transform(mut self, transform: impl Transform + 'static) -> Self {
        self.directory.push(Box::new(transform));
        self
    }

    /// Names of the registered checks and transforms, in run order.
    pub fn describe(&self) -> Vec<&'static str> {
        self.checks
            .iter()
            .map(|c| c.name())
            .chain(
                [&self.repository, &self.world, &self.directory]
                    .into_iter()
                    .flatten()
                    .map(|t| t.name()),
            )
            .collect()
    }

    /// Run checks and transforms on a document at [`Stage::Raw`].
    ///
    /// `scope.document` must be the document's virtual address.
    pub fn run(&self, document: &mut Document, scope: &LinkScope<'_>, tracer: &dyn Tracer) {
        for binding in document.bindings_mut() {
            self.run_checks(binding, scope);
        }
        document.advance(Stage::Checked);

        let stages = [
            (Stage::RepoTransformed, &self.repository),
            (Stage::WorldTransformed, &self.world),
            (Stage::TargetDirectoryResolved, &self.directory),
        ];
        for (stage, transforms) in stages {
            for binding in document.bindings_mut() {
                run_transforms(binding, transforms, scope, tracer);
            }
            document.advance(stage);
        }
    }

    fn run_checks(&self, binding: &mut LinkBinding, scope: &LinkScope<'_>) {
        for check in &self.checks {
            for finding in check.check(binding, scope) {
                match self.check_level {
                    CheckLevel::Warn => binding.push_info(format!("{}: {finding}", check.name())),
                    CheckLevel::Error => binding.push_error(LinkError::Check {
                        check: check.name(),
                        message: finding,
                    }),
                }
            }
        }
    }
}

/// Thread `current` through `transforms`.
///
/// The first failure is recorded and stops every later transform of the binding.
fn run_transforms(
    binding: &mut LinkBinding,
    transforms: &[Box<dyn Transform>],
    scope: &LinkScope<'_>,
    tracer: &dyn Tracer,
) {
    if binding.is_error() {
        return;
    }
    let mut current = binding.current().clone();
    for transform in transforms {
        if !transform.applies_to(binding) {
            continue;
        }
        match transform.transform(&current, scope) {
            Ok(next) => current = next,
            Err(err) => {
                tracer.debug(&format!("{}: {} failed: {err}", scope.document, transform.name()));
                binding.push_error(err);
                return;
            }
        }
    }
    binding.set_current(current);
}

#[cfg(test)]
mod tests;
