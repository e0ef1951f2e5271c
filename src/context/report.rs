//! Diagnostics summary after processing.

use super::Context;
use crate::logger::Tracer;
use crate::utils::plural::Count;

/// Counts of what processing found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Report {
    pub documents: usize,
    pub links: usize,
    pub errors: usize,
    pub infos: usize,
    /// Documents that could not be built or addressed.
    pub failures: usize,
}

impl Report {
    #[inline]
    pub const fn is_ok(&self) -> bool {
        self.errors == 0 && self.failures == 0
    }
}

impl Context {
    /// Trace every diagnostic, grouped per document, and count them.
    pub fn report(&self, tracer: &dyn Tracer) -> Report {
        let mut report = Report::default();

        for repository in self.repositories() {
            for failure in repository.failures() {
                tracer.error(&failure.to_string());
                report.failures += 1;
            }
            for document in repository.documents().values() {
                report.documents += 1;
                report.links += document.bindings().len();

                let noisy = document
                    .bindings()
                    .iter()
                    .any(|b| !b.errors().is_empty() || !b.infos().is_empty());
                if !noisy {
                    continue;
                }
                let _scope = tracer.open(&document.local_path().to_string());
                for binding in document.bindings() {
                    for error in binding.errors() {
                        tracer.error(&format!("`{}`: {error}", binding.origin()));
                        report.errors += 1;
                    }
                    for info in binding.infos() {
                        tracer.info(&format!("`{}`: {info}", binding.origin()));
                        report.infos += 1;
                    }
                }
            }
        }

        let summary = format!(
            "{}, {}: {}, {}",
            Count(report.documents, "document"),
            Count(report.links, "link"),
            Count(report.errors + report.failures, "error"),
            Count(report.infos, "warning"),
        );
        if report.is_ok() {
            tracer.info(&summary);
        } else {
            tracer.error(&summary);
        }
        report
    }
}
