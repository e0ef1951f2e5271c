//! Generated HTML around the rendered markdown.
//!
//! - **Page**: the document shell every rendered markdown body is wrapped in
//! - **TOC**: one table of contents per world, at the output root

pub mod page;
pub mod toc;
