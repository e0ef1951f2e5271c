//! Link classification utilities.

use super::PathValue;

/// Extensions of source, script and query files linked from documentation.
const CODE_EXTENSIONS: [&str; 11] = [
    "cs", "rs", "ts", "tsx", "js", "jsx", "py", "sh", "ps1", "bat", "sql",
];

/// Classification of a link target, derived once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkType {
    /// Rooted target: absolute local path or URL.
    External,
    /// Relative `.md` target.
    InternalMarkdown,
    /// Relative target of a markdown image.
    InternalImage,
    /// Relative source or script file.
    InternalCode,
    /// Relative target without extension, may resolve to an index document.
    InternalDirectory,
    Unknown,
}

impl LinkType {
    /// Classify a parsed link target.
    pub fn classify(origin: &PathValue, is_image: bool) -> Self {
        if origin.is_rooted() {
            return Self::External;
        }
        if is_image {
            return Self::InternalImage;
        }
        match origin.extension() {
            None => Self::InternalDirectory,
            Some(_) if origin.has_extension("md") => Self::InternalMarkdown,
            Some(ext) if CODE_EXTENSIONS.iter().any(|c| ext.eq_ignore_ascii_case(c)) => {
                Self::InternalCode
            }
            Some(_) => Self::Unknown,
        }
    }

    #[inline]
    pub const fn is_code(self) -> bool {
        matches!(self, Self::InternalCode)
    }

    #[inline]
    pub const fn is_external(self) -> bool {
        matches!(self, Self::External)
    }
}

/// Check if a link only targets an anchor of the current document.
///
/// `./#fragment` is semantically equivalent to `#fragment`.
#[inline]
pub fn is_fragment_only(link: &str) -> bool {
    link.starts_with('#') || link.starts_with("./#")
}

/// Split a link into target and fragment parts.
///
/// # Examples
/// ```ignore
/// assert_eq!(split_path_fragment("guide.md#install"), ("guide.md", "install"));
/// assert_eq!(split_path_fragment("guide.md"), ("guide.md", ""));
/// ```
#[inline]
pub fn split_path_fragment(link: &str) -> (&str, &str) {
    link.split_once('#').unwrap_or((link, ""))
}
