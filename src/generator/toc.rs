//! Per-world table of contents.
//!
//! # Format
//!
//! ```html
//! <h1>CK 1.0</h1>
//! <h2>CK-Core <small>v1.2.0</small></h2>
//! <ul>
//!   <li><a href="CK-Core/README.html">CK-Core</a></li>
//! </ul>
//! ```

use crate::core::PathValue;
use crate::generator::page::render_page;
use crate::utils::html::{escape, escape_attr};
use crate::world::World;

struct Section {
    name: String,
    version: Option<String>,
    entries: Vec<Entry>,
}

struct Entry {
    title: String,
    href: String,
}

struct Toc {
    title: String,
    sections: Vec<Section>,
}

impl Toc {
    fn build(world: &World, output: &PathValue) -> Self {
        let sections = world
            .repositories()
            .values()
            .map(|repository| Section {
                name: repository.name().to_string(),
                version: repository.info().version.clone(),
                entries: repository
                    .documents()
                    .values()
                    .map(|document| Entry {
                        title: document.title(),
                        href: document
                            .current()
                            .strip_prefix(output)
                            .unwrap_or_else(|| document.current().clone())
                            .to_string(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            title: world.info().to_string(),
            sections,
        }
    }

    fn into_html(self) -> String {
        let mut body = String::with_capacity(1024);
        body.push_str("<h1>");
        body.push_str(&escape(&self.title));
        body.push_str("</h1>\n");

        for section in self.sections {
            body.push_str("<h2>");
            body.push_str(&escape(&section.name));
            if let Some(version) = &section.version {
                body.push_str(" <small>");
                body.push_str(&escape(version));
                body.push_str("</small>");
            }
            body.push_str("</h2>\n<ul>\n");
            for entry in section.entries {
                body.push_str("  <li><a href=\"");
                body.push_str(&escape_attr(&entry.href));
                body.push_str("\">");
                body.push_str(&escape(&entry.title));
                body.push_str("</a></li>\n");
            }
            body.push_str("</ul>\n");
        }

        render_page(&self.title, &body)
    }
}

/// Table of contents of `world`, with links relative to `output`.
///
/// Documents must already be post-processed, their address lying under
/// `output`.
pub fn render_toc(world: &World, output: &PathValue) -> String {
    Toc::build(world, output).into_html()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::VirtualRoot;
    use crate::document::{Document, Stage};
    use crate::logger::MemoryTracer;
    use crate::markdown::{MarkdownEngine, PulldownEngine};
    use crate::repository::{Repository, RepositoryInfo};
    use crate::world::WorldInfo;

    #[test]
    fn test_render_toc() {
        let tracer = MemoryTracer::new();
        let root = PathValue::parse("/in/Stack/Core");
        let info = RepositoryInfo::new("Core", root.clone()).with_version("v1.2.0");
        let mut repository = Repository::new(info);

        let ast = PulldownEngine::default().parse("# Core & docs\n\ntext");
        let mut document = Document::new(root.append_segment("README.md"), ast, &tracer).unwrap();
        document.attach(&VirtualRoot::compute([&root])).unwrap();
        while document.stage() < Stage::TargetDirectoryResolved {
            let next = document.stage().next().unwrap();
            document.advance(next);
        }
        let output = PathValue::parse("/out");
        document.post_process(&output);
        repository.insert(document);

        let mut world = World::new(WorldInfo::new("CK", "1.0"));
        world.insert(repository);

        let html = render_toc(&world, &output);
        assert!(html.contains("<h1>CK 1.0</h1>"), "{html}");
        assert!(html.contains("<h2>Core <small>v1.2.0</small></h2>"), "{html}");
        assert!(html.contains(r#"<a href="README.html">Core &amp; docs</a>"#), "{html}");
    }
}
