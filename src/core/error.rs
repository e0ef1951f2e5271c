//! Link resolution errors.
//!
//! Errors are attached to the binding or document that produced them. Only
//! construction errors cross a component boundary.

use thiserror::Error;

/// Errors produced while building or resolving a link.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// A link with an empty target (`[text]()`).
    #[error("empty link target")]
    EmptyLink,

    /// A relative link that is already nested under its document directory.
    #[error("cannot determine a root for `{0}`")]
    CannotDetermineRoot(String),

    /// Dot resolution went above the first segment of a relative path.
    #[error("`{0}` goes above its own scope")]
    OutOfScope(String),

    /// Dot resolution went above the virtual root.
    #[error("`{0}` escapes the virtual root, is a target missing?")]
    AboveVirtualRoot(String),

    /// Dot resolution went above a file-system or URL root.
    #[error("`{0}` goes above its root")]
    AboveRoot(String),

    /// A path that must live under the virtual root does not.
    #[error("`{path}` is not under the virtual root `{root}`")]
    NotUnderVirtualRoot { path: String, root: String },

    /// A check finding promoted to an error.
    #[error("{check}: {message}")]
    Check { check: &'static str, message: String },
}
