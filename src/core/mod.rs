//! Core types - pure path algebra and link classification.

mod error;
mod link;
mod path;
mod relative;

pub use error::LinkError;
pub use link::{LinkType, is_fragment_only, split_path_fragment};
pub use path::{PathValue, RootKind, VIRTUAL_MARKER};
pub use relative::create_relative;
