//! Markdown parsing and rendering.
//!
//! - [`MarkdownEngine`] - the parse/render seam the engine consumes
//! - [`PulldownEngine`] - implementation on top of `pulldown-cmark`
//! - [`MarkdownAst`] - event stream with addressable [`LinkNode`]s

mod ast;

use pulldown_cmark::{Options, Parser, html};

pub use ast::{LinkNode, MarkdownAst};

/// Markdown parser and HTML renderer.
pub trait MarkdownEngine: Send + Sync {
    fn parse(&self, text: &str) -> MarkdownAst;

    fn render(&self, ast: &MarkdownAst) -> String;
}

/// Options for markdown parsing
#[derive(Debug, Clone, Default)]
pub struct MarkdownOptions {
    /// Enable tables extension
    pub tables: bool,
    /// Enable footnotes extension
    pub footnotes: bool,
    /// Enable strikethrough extension
    pub strikethrough: bool,
    /// Enable task lists extension
    pub task_lists: bool,
    /// Enable heading attributes extension (e.g., `# Heading {#custom-id}`)
    pub heading_attributes: bool,
}

impl MarkdownOptions {
    /// Create options with all extensions enabled
    pub fn all() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            task_lists: true,
            heading_attributes: true,
        }
    }

    fn to_pulldown_options(&self) -> Options {
        let mut opts = Options::empty();
        if self.tables {
            opts.insert(Options::ENABLE_TABLES);
        }
        if self.footnotes {
            opts.insert(Options::ENABLE_FOOTNOTES);
        }
        if self.strikethrough {
            opts.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.task_lists {
            opts.insert(Options::ENABLE_TASKLISTS);
        }
        if self.heading_attributes {
            opts.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        }
        opts
    }
}

/// `pulldown-cmark` backed engine.
#[derive(Debug, Clone, Default)]
pub struct PulldownEngine {
    options: MarkdownOptions,
}

impl PulldownEngine {
    pub fn new(options: MarkdownOptions) -> Self {
        Self { options }
    }
}

impl MarkdownEngine for PulldownEngine {
    fn parse(&self, text: &str) -> MarkdownAst {
        MarkdownAst::from_events(Parser::new_ext(text, self.options.to_pulldown_options()))
    }

    fn render(&self, ast: &MarkdownAst) -> String {
        let mut out = String::new();
        html::push_html(&mut out, ast.events().iter().cloned());
        out
    }
}
