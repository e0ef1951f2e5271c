//! Utility modules.

pub mod git;
pub mod html;
pub mod plural;
