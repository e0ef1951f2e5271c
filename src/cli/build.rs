//! `docstack build`: resolve every link and write the HTML output.
//!
//! Phases:
//! - **Load** - read repositories, detect branches, register worlds
//! - **Process** - checks and transforms, then post-processing
//! - **Report** - print diagnostics
//! - **Apply** - write pages, linked files and tables of contents

use std::fs;

use anyhow::{Context, Result};

use super::common::{load_context, pipeline};
use crate::config::DocstackConfig;
use crate::core::PathValue;
use crate::log;
use crate::logger::{ConsoleTracer, Tracer};
use crate::markdown::{MarkdownOptions, PulldownEngine};

pub fn build_stack(config: &DocstackConfig) -> Result<()> {
    let tracer = ConsoleTracer::new("build");
    let tracer: &dyn Tracer = &tracer;
    let engine = PulldownEngine::new(MarkdownOptions::all());

    let output = &config.build.output;
    if config.build.clean && output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("failed to clean {}", output.display()))?;
    }

    let mut context = load_context(config, &engine, tracer)?;
    let output = PathValue::from_path(output)
        .resolve_dots(0)
        .with_context(|| format!("invalid output path {}", output.display()))?;
    context.set_output(output);
    context.process(&pipeline(config, tracer)?, tracer);

    context.report(tracer);
    let summary = context.apply(&engine, tracer)?;
    log!(
        "build";
        "done: {} pages in {}",
        summary.documents,
        config.build.output.display()
    );
    Ok(())
}
