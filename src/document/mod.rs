//! Documents - one parsed markdown file and its link bindings.
//!
//! A [`Document`] is built once from its AST: every link node becomes a
//! [`LinkBinding`], except pure fragment links which never need rewriting.
//! The pipeline then moves it through the [`Stage`]s.

mod binding;
mod directory;
mod stage;

pub use binding::LinkBinding;
pub use directory::transform_target_directory;
pub use stage::Stage;

use crate::address::VirtualRoot;
use crate::context::EmitError;
use crate::core::{LinkError, LinkType, PathValue, create_relative, is_fragment_only};
use crate::logger::Tracer;
use crate::markdown::MarkdownAst;

/// A parsed markdown file.
#[derive(Debug, Clone)]
pub struct Document {
    local_path: PathValue,
    ast: MarkdownAst,
    bindings: Vec<LinkBinding>,
    /// Virtual address until post-processing, output path afterwards.
    current: PathValue,
    stage: Stage,
}

impl Document {
    /// Bind every link of `ast`.
    ///
    /// # Errors
    ///
    /// The first construction error of any link aborts the document.
    pub fn new(
        local_path: PathValue,
        ast: MarkdownAst,
        tracer: &dyn Tracer,
    ) -> Result<Self, LinkError> {
        let directory = local_path.parent();
        let mut bindings = Vec::with_capacity(ast.links().len());

        for (node, link) in ast.links().iter().enumerate() {
            if is_fragment_only(&link.url) {
                continue;
            }
            let binding = LinkBinding::new(node, &link.url, &link.text, link.is_image, &directory)?;
            if binding.link_type() == LinkType::Unknown {
                tracer.warn(&format!("{local_path}: cannot determine the type of `{}`", link.url));
            }
            bindings.push(binding);
        }

        Ok(Self {
            current: local_path.clone(),
            local_path,
            ast,
            bindings,
            stage: Stage::Raw,
        })
    }

    /// Address the document and its links under `root`, back at [`Stage::Raw`].
    pub(crate) fn attach(&mut self, root: &VirtualRoot) -> Result<(), LinkError> {
        self.current = root.attach(&self.local_path)?;
        for binding in &mut self.bindings {
            binding.attach(root);
        }
        self.stage = Stage::Raw;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    #[inline]
    pub fn local_path(&self) -> &PathValue {
        &self.local_path
    }

    #[inline]
    pub fn ast(&self) -> &MarkdownAst {
        &self.ast
    }

    #[inline]
    pub fn bindings(&self) -> &[LinkBinding] {
        &self.bindings
    }

    #[inline]
    pub fn current(&self) -> &PathValue {
        &self.current
    }

    #[inline]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// True when any binding carries an error.
    pub fn is_error(&self) -> bool {
        self.bindings.iter().any(LinkBinding::is_error)
    }

    /// Title for listings: first heading, else the file name.
    pub fn title(&self) -> String {
        self.ast
            .title()
            .or_else(|| self.local_path.last_segment().map(str::to_string))
            .unwrap_or_default()
    }

    pub(crate) fn bindings_mut(&mut self) -> &mut [LinkBinding] {
        &mut self.bindings
    }

    pub(crate) fn advance(&mut self, stage: Stage) {
        debug_assert!(self.stage.next() == Some(stage), "{} -> {stage}", self.stage);
        self.stage = stage;
    }

    // ------------------------------------------------------------------------
    // Post-processing
    // ------------------------------------------------------------------------

    /// Turn virtual link targets into paths relative to this document.
    ///
    /// Markdown targets (code files excluded) get the `.html` extension. The
    /// document's own address moves under `output`.
    pub(crate) fn post_process(&mut self, output: &PathValue) {
        let own = self.current.clone();
        let directory = own.parent();

        for binding in self.bindings.iter_mut().filter(|b| !b.is_error()) {
            let target = binding.current();
            if !target.is_virtual() {
                continue;
            }
            let target = match target.resolve_dots(0) {
                Ok(target) => target,
                Err(err) => {
                    binding.push_error(err);
                    continue;
                }
            };
            binding.set_resolved(target.clone());
            let target = if !binding.link_type().is_code() && target.has_extension("md") {
                target.with_extension("html")
            } else {
                target
            };
            match create_relative(&directory, &target) {
                Ok(relative) => binding.set_current(relative),
                Err(err) => binding.push_error(err),
            }
        }

        let own = if own.has_extension("md") { own.with_extension("html") } else { own };
        self.current = output.combine(&own.remove_first_segments(0));
        self.advance(Stage::PostProcessed);
    }

    /// Write every binding's target back into the AST.
    ///
    /// # Errors
    ///
    /// Refused when the document is in error; the AST is left untouched.
    pub fn apply(&mut self) -> Result<(), EmitError> {
        if self.is_error() {
            return Err(EmitError::Refused {
                documents: vec![self.local_path.to_string()],
            });
        }
        for binding in &self.bindings {
            self.ast.set_url(binding.node(), &binding.href());
        }
        self.advance(Stage::Applied);
        Ok(())
    }
}
