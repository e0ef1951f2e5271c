//! Shared loading for `build` and `check`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};

use crate::config::{DocstackConfig, RepositorySection};
use crate::context::{Context, ContextOptions};
use crate::core::PathValue;
use crate::logger::Tracer;
use crate::markdown::MarkdownEngine;
use crate::pipeline::{HttpChecker, LinkAvailabilityChecker, Pipeline, PipelineOptions};
use crate::repository::{RepositoryInfo, RepositoryReader};
use crate::utils::git::{GitInspector, GixInspector};
use crate::world::WorldInfo;

/// Read every configured repository and register it.
pub fn load_context(
    config: &DocstackConfig,
    engine: &dyn MarkdownEngine,
    tracer: &dyn Tracer,
) -> Result<Context> {
    let mut context = Context::new(ContextOptions {
        index_files: config.build.index_files.clone(),
        branch_aware: config.git.enable,
    });
    let reader = RepositoryReader::new(engine, tracer, &config.build.exclude);
    let inspector = config.git.enable.then_some(GixInspector);

    for world in &config.world {
        let _scope = tracer.open(&format!("world {} {}", world.name, world.version));
        for section in &world.repositories {
            let git = inspector.as_ref().map(|i| i as &dyn GitInspector);
            let info = repository_info(section, git, tracer)?;
            let repository = reader.read(info);
            context.register(WorldInfo::new(&world.name, &world.version), repository, tracer);
        }
    }
    Ok(context)
}

/// Repository identity from config, completed by git detection.
fn repository_info(
    section: &RepositorySection,
    inspector: Option<&dyn GitInspector>,
    tracer: &dyn Tracer,
) -> Result<RepositoryInfo> {
    let root = PathValue::from_path(&section.path)
        .resolve_dots(0)
        .with_context(|| format!("invalid repository path {}", section.path.display()))?;
    let mut info = RepositoryInfo::new(section.name(), root);

    let remote = section.remote.clone().or_else(|| {
        let inspector = inspector?;
        detect(tracer, "remote", || inspector.remote_url(&section.path))
    });
    if let Some(remote) = remote {
        info = info.with_remote(&remote);
    }

    let branch = section.branch.clone().or_else(|| {
        let inspector = inspector?;
        detect(tracer, "branch", || inspector.current_branch(&section.path))
    });
    if let Some(branch) = branch {
        tracer.debug(&format!("{}: branch {branch}", info.name));
        info = info.with_branch(&branch);
    }

    if let Some(version) = &section.version {
        info = info.with_version(version);
    }
    Ok(info)
}

fn detect(
    tracer: &dyn Tracer,
    what: &str,
    f: impl FnOnce() -> Result<Option<String>>,
) -> Option<String> {
    f().unwrap_or_else(|err| {
        tracer.warn(&format!("cannot detect {what}: {err:#}"));
        None
    })
}

/// Standard pipeline configured from `[check]`.
pub fn pipeline(config: &DocstackConfig, tracer: &dyn Tracer) -> Result<Pipeline> {
    let availability = if config.check.availability {
        let checker = HttpChecker::new(Duration::from_secs(config.check.timeout))
            .context("failed to create HTTP client")?;
        Some(Arc::new(checker) as Arc<dyn LinkAvailabilityChecker>)
    } else {
        None
    };
    let pipeline = Pipeline::standard(PipelineOptions {
        check_level: config.check.level,
        availability,
        skip_prefixes: config.check.skip_prefixes.clone(),
    });
    tracer.debug(&format!("pipeline: {}", pipeline.describe().join(" -> ")));
    Ok(pipeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::MemoryTracer;
    use std::path::PathBuf;

    #[test]
    fn test_configured_identity_wins() {
        let tracer = MemoryTracer::new();
        let section = RepositorySection {
            path: PathBuf::from("/stack/tools/../CK-Core"),
            name: None,
            remote: Some("https://github.com/Invenietis/CK-Core".into()),
            branch: Some("develop".into()),
            version: Some("v1.2.0".into()),
        };
        let info = repository_info(&section, None, &tracer).unwrap();
        assert_eq!(info.name, "CK-Core");
        assert_eq!(info.local_root, PathValue::parse("/stack/CK-Core"));
        assert_eq!(info.branch, Some(PathValue::parse("develop")));
        assert_eq!(info.version.as_deref(), Some("v1.2.0"));
    }

    #[test]
    fn test_pipeline_traces_its_stages() {
        let tracer = MemoryTracer::new();
        let config = crate::config::test_parse_config("[check]\nlevel = \"error\"");
        let pipeline = pipeline(&config, &tracer).unwrap();
        assert!(!pipeline.describe().contains(&"availability"));
        let debug = tracer.messages(crate::logger::Level::Debug);
        assert!(
            debug.iter().any(|m| m.starts_with("pipeline: repository")),
            "{debug:?}"
        );
    }
}
