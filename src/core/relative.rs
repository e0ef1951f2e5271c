//! Relative path construction between two [`PathValue`]s.

use super::{LinkError, PathValue};

/// Build the path, relative to `source`, that denotes `target`.
///
/// Policy, in order:
/// 1. Different roots: a rooted `target` is returned unchanged, a rooted
///    `source` is combined with the relative `target`.
/// 2. Equal paths give the empty path.
/// 3. `target` under `source` gives the suffix.
/// 4. `source` under `target` gives one `..` per extra segment.
/// 5. Otherwise climb to the common prefix and descend into `target`.
///
/// Leading `..` runs already present in `target` survive dot resolution.
///
/// # Examples
///
/// - `("Project/A/B/C", "Project/A")` -> `"../.."`
/// - `("A/B/C", "Project/A/B/C/D")` -> `"../../../Project/A/B/C/D"`
/// - `("~/Pictures", "~/Documents/A")` -> `"../Documents/A"`
pub fn create_relative(source: &PathValue, target: &PathValue) -> Result<PathValue, LinkError> {
    if !source.same_root(target) {
        if target.is_rooted() {
            return Ok(target.clone());
        }
        if source.is_rooted() {
            return source.combine(target).resolve_dots_smart();
        }
    }

    if source == target {
        return Ok(PathValue::empty());
    }

    if target.starts_with(source) {
        return target
            .remove_first_segments(source.len())
            .resolve_dots_smart();
    }

    if source.starts_with(target) {
        return Ok(climb(source.len() - target.len()));
    }

    let common = source.common_prefix(target).len();
    let suffix = target.remove_first_segments(common);
    climb(source.len() - common)
        .combine(&suffix)
        .resolve_dots_smart()
}

/// A relative path made of `count` `..` segments.
fn climb(count: usize) -> PathValue {
    (0..count).fold(PathValue::empty(), |path, _| path.append_segment(".."))
}
