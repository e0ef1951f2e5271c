//! `docstack check`: resolve every link and print diagnostics only.

use anyhow::{Result, bail};

use super::common::{load_context, pipeline};
use crate::config::DocstackConfig;
use crate::logger::{ConsoleTracer, Tracer};
use crate::markdown::{MarkdownOptions, PulldownEngine};
use crate::utils::plural::Count;

pub fn check_stack(config: &DocstackConfig) -> Result<()> {
    let tracer = ConsoleTracer::new("check");
    let tracer: &dyn Tracer = &tracer;
    let engine = PulldownEngine::new(MarkdownOptions::all());

    let mut context = load_context(config, &engine, tracer)?;
    context.process(&pipeline(config, tracer)?, tracer);

    let report = context.report(tracer);
    if !report.is_ok() {
        bail!(
            "{} in {}",
            Count(report.errors + report.failures, "error"),
            Count(report.documents, "document")
        );
    }
    Ok(())
}
