//! VirtualRoot - the mapping between local checkouts and the `~` address space.

use crate::core::{LinkError, PathValue, create_relative};

/// Common ancestor of every registered repository root.
///
/// Every repository root starts with [`VirtualRoot::local`]. Paths under it
/// are addressed as `~/<rest>` so they survive any checkout location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VirtualRoot {
    local: PathValue,
}

impl VirtualRoot {
    /// Longest common leading-segment prefix of `roots`.
    pub fn compute<'a>(roots: impl IntoIterator<Item = &'a PathValue>) -> Self {
        let mut roots = roots.into_iter();
        let local = match roots.next() {
            Some(first) => roots.fold(first.clone(), |acc, root| acc.common_prefix(root)),
            None => PathValue::empty(),
        };
        Self { local }
    }

    /// The local path the virtual marker stands for.
    #[inline]
    pub fn local(&self) -> &PathValue {
        &self.local
    }

    /// Address a local path under the virtual root.
    ///
    /// Fails for any path outside of it.
    pub fn attach(&self, path: &PathValue) -> Result<PathValue, LinkError> {
        if self.local.is_empty() {
            return Err(self.not_under(path));
        }
        path.strip_prefix(&self.local)
            .map(|rest| PathValue::virtual_root().combine(&rest))
            .ok_or_else(|| self.not_under(path))
    }

    /// Address a local link target, keeping escapes visible.
    ///
    /// Targets outside the virtual root keep their leading `..` run
    /// (`~/../Outside`) so that resolution fails later with
    /// [`LinkError::AboveVirtualRoot`]. Targets of another root kind are
    /// returned unchanged.
    pub fn virtualize(&self, path: &PathValue) -> PathValue {
        if let Ok(attached) = self.attach(path) {
            return attached;
        }
        if self.local.is_empty() || !path.same_root(&self.local) {
            return path.clone();
        }
        match create_relative(&self.local, path) {
            Ok(relative) if relative.is_relative() => PathValue::virtual_root().combine(&relative),
            _ => path.clone(),
        }
    }

    /// Map a virtual address back to a concrete local path.
    pub fn to_local(&self, path: &PathValue) -> Result<PathValue, LinkError> {
        if !path.is_virtual() {
            return Ok(path.clone());
        }
        let rest = path.resolve_dots(0)?.remove_first_segments(0);
        Ok(self.local.combine(&rest))
    }

    fn not_under(&self, path: &PathValue) -> LinkError {
        LinkError::NotUnderVirtualRoot {
            path: path.to_string(),
            root: self.local.to_string(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
