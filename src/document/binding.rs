//! LinkBinding - one hyperlink of one document and its resolution state.

use percent_encoding::percent_decode_str;

use crate::address::VirtualRoot;
use crate::core::{LinkError, LinkType, PathValue, split_path_fragment};

/// One raw hyperlink found in a document.
///
/// `origin`, `rooted` and `link_type` are fixed at construction. `current`
/// is replaced, never edited, by each pipeline stage.
#[derive(Debug, Clone)]
pub struct LinkBinding {
    /// Index of the link node in the owning document's AST.
    node: usize,
    /// Target as written, without fragment.
    raw: String,
    origin: PathValue,
    fragment: String,
    text: String,
    link_type: LinkType,
    rooted: PathValue,
    current: PathValue,
    /// Virtual target captured by post-processing, before it turns relative.
    resolved: Option<PathValue>,
    errors: Vec<LinkError>,
    infos: Vec<String>,
}

impl LinkBinding {
    /// Bind the raw link target `raw` found in a document under `directory`.
    ///
    /// Pure fragment links are filtered by the caller.
    pub fn new(
        node: usize,
        raw: &str,
        text: &str,
        is_image: bool,
        directory: &PathValue,
    ) -> Result<Self, LinkError> {
        let (target, fragment) = split_path_fragment(raw.trim());
        let origin = PathValue::parse(target);
        if origin.is_empty() {
            return Err(LinkError::EmptyLink);
        }

        let rooted = if origin.is_rooted() {
            origin.clone()
        } else if !origin.starts_with(directory) {
            directory.combine(&decode(target)).resolve_dots(0)?
        } else {
            return Err(LinkError::CannotDetermineRoot(origin.to_string()));
        };

        Ok(Self {
            node,
            raw: target.to_string(),
            link_type: LinkType::classify(&origin, is_image),
            current: rooted.clone(),
            origin,
            fragment: fragment.to_string(),
            text: text.to_string(),
            rooted,
            resolved: None,
            errors: Vec::new(),
            infos: Vec::new(),
        })
    }

    /// Seed `current` in the virtual address space and reset diagnostics.
    pub(crate) fn attach(&mut self, root: &VirtualRoot) {
        self.current = if self.link_type.is_external() {
            self.rooted.clone()
        } else {
            root.virtualize(&self.rooted)
        };
        self.resolved = None;
        self.errors.clear();
        self.infos.clear();
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    #[inline]
    pub const fn node(&self) -> usize {
        self.node
    }

    #[inline]
    pub fn origin(&self) -> &PathValue {
        &self.origin
    }

    /// Fragment without `#`, empty when absent.
    #[inline]
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub const fn link_type(&self) -> LinkType {
        self.link_type
    }

    /// Target in local-disk address space.
    #[inline]
    pub fn rooted(&self) -> &PathValue {
        &self.rooted
    }

    #[inline]
    pub fn current(&self) -> &PathValue {
        &self.current
    }

    /// Virtual target once post-processed, `None` for links left outside
    /// the virtual root.
    #[inline]
    pub fn resolved(&self) -> Option<&PathValue> {
        self.resolved.as_ref()
    }

    #[inline]
    pub fn errors(&self) -> &[LinkError] {
        &self.errors
    }

    #[inline]
    pub fn infos(&self) -> &[String] {
        &self.infos
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        !self.errors.is_empty()
    }

    // ------------------------------------------------------------------------
    // Mutation (pipeline only)
    // ------------------------------------------------------------------------

    pub(crate) fn set_current(&mut self, current: PathValue) {
        self.current = current;
    }

    pub(crate) fn set_resolved(&mut self, resolved: PathValue) {
        self.resolved = Some(resolved);
    }

    pub(crate) fn push_error(&mut self, error: LinkError) {
        self.errors.push(error);
    }

    pub(crate) fn push_info(&mut self, info: String) {
        self.infos.push(info);
    }

    /// Link target as written back into the document.
    ///
    /// Untouched targets keep their original spelling.
    pub fn href(&self) -> String {
        let path = if self.current == self.origin {
            self.raw.clone()
        } else if self.current.is_empty() {
            "./".to_string()
        } else {
            self.current.to_string()
        };
        if self.fragment.is_empty() {
            path
        } else {
            format!("{path}#{}", self.fragment)
        }
    }
}

/// Relative targets name files on disk: `my%20guide.md` is `my guide.md`.
fn decode(target: &str) -> PathValue {
    let decoded = percent_decode_str(target)
        .decode_utf8()
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| target.to_string());
    PathValue::parse(&decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir() -> PathValue {
        PathValue::parse("/in/Stack/Repo1/docs")
    }

    fn bind(raw: &str) -> Result<LinkBinding, LinkError> {
        LinkBinding::new(0, raw, "text", false, &dir())
    }

    fn vroot() -> VirtualRoot {
        let roots = [
            PathValue::parse("/in/Stack/Repo1"),
            PathValue::parse("/in/Stack/Repo2"),
        ];
        VirtualRoot::compute(&roots)
    }

    #[test]
    fn test_rooted_resolution() {
        let binding = bind("../Project/README.md").unwrap();
        assert_eq!(binding.rooted(), &PathValue::parse("/in/Stack/Repo1/Project/README.md"));
        assert_eq!(binding.link_type(), LinkType::InternalMarkdown);

        let binding = bind("https://github.com/Org/Repo1").unwrap();
        assert_eq!(binding.rooted(), binding.origin());
        assert_eq!(binding.link_type(), LinkType::External);
    }

    #[test]
    fn test_rooted_is_percent_decoded() {
        let binding = bind("my%20guide.md").unwrap();
        assert_eq!(binding.rooted(), &PathValue::parse("/in/Stack/Repo1/docs/my guide.md"));
        assert_eq!(binding.origin(), &PathValue::parse("my%20guide.md"));

        let binding = bind("https://example.com/a%20b").unwrap();
        assert_eq!(binding.rooted(), &PathValue::parse("https://example.com/a%20b"));
    }

    #[test]
    fn test_fragment_is_split() {
        let binding = bind("guide.md#install").unwrap();
        assert_eq!(binding.origin(), &PathValue::parse("guide.md"));
        assert_eq!(binding.fragment(), "install");
        assert_eq!(binding.href(), "/in/Stack/Repo1/docs/guide.md#install");
    }

    #[test]
    fn test_empty_link() {
        assert_eq!(bind("").unwrap_err(), LinkError::EmptyLink);
        assert_eq!(bind("  ").unwrap_err(), LinkError::EmptyLink);
    }

    #[test]
    fn test_cannot_determine_root() {
        let err =
            LinkBinding::new(0, "docs/a.md", "", false, &PathValue::parse("docs")).unwrap_err();
        assert!(matches!(err, LinkError::CannotDetermineRoot(_)));
    }

    #[test]
    fn test_attach_virtualizes_internal_links() {
        let root = vroot();

        let mut binding = bind("../../Repo2/README.md").unwrap();
        binding.attach(&root);
        assert_eq!(binding.current(), &PathValue::parse("~/Repo2/README.md"));

        let mut binding = bind("../../../OutsideRepo").unwrap();
        binding.attach(&root);
        assert_eq!(binding.current(), &PathValue::parse("~/../OutsideRepo"));

        let mut binding = bind("/in/Stack/Repo1/README.md").unwrap();
        binding.attach(&root);
        assert_eq!(binding.current(), &PathValue::parse("/in/Stack/Repo1/README.md"));
    }

    #[test]
    fn test_attach_resets_diagnostics() {
        let mut binding = bind("a.md").unwrap();
        binding.push_error(LinkError::OutOfScope("x".into()));
        binding.push_info("info".into());
        binding.attach(&vroot());
        assert!(!binding.is_error());
        assert!(binding.infos().is_empty());
    }

    #[test]
    fn test_href_of_empty_current() {
        let mut binding = bind("a.md#top").unwrap();
        binding.set_current(PathValue::empty());
        assert_eq!(binding.href(), "./#top");
    }
}
