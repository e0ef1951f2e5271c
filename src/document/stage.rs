//! Per-document pipeline state.

use std::fmt;

/// Progress of one document through the pipeline.
///
/// Stages only move forward, one step at a time, except when the virtual
/// root changes and the document is attached again from [`Stage::Raw`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    #[default]
    Raw,
    Checked,
    RepoTransformed,
    WorldTransformed,
    TargetDirectoryResolved,
    PostProcessed,
    Applied,
}

impl Stage {
    /// The stage that follows `self`, `None` once applied.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Raw => Some(Self::Checked),
            Self::Checked => Some(Self::RepoTransformed),
            Self::RepoTransformed => Some(Self::WorldTransformed),
            Self::WorldTransformed => Some(Self::TargetDirectoryResolved),
            Self::TargetDirectoryResolved => Some(Self::PostProcessed),
            Self::PostProcessed => Some(Self::Applied),
            Self::Applied => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Checked => "checked",
            Self::RepoTransformed => "repository-transformed",
            Self::WorldTransformed => "world-transformed",
            Self::TargetDirectoryResolved => "target-directory-resolved",
            Self::PostProcessed => "post-processed",
            Self::Applied => "applied",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_walk() {
        let mut stage = Stage::default();
        let mut seen = vec![stage];
        while let Some(next) = stage.next() {
            assert!(next > stage);
            stage = next;
            seen.push(stage);
        }
        assert_eq!(seen.len(), 7);
        assert_eq!(stage, Stage::Applied);
    }
}
