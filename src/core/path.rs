//! Structured path value.
//!
//! A [`PathValue`] is a root kind plus an ordered list of non-empty segments.
//! It is never mutated: every operation returns a new value. Comparisons are
//! purely structural and never touch the file system.
//!
//! | Input                         | Kind                      | Root       | Segments                |
//! |-------------------------------|---------------------------|------------|-------------------------|
//! | `docs/a.md`                   | `Relative`                |            | `docs`, `a.md`          |
//! | `/in/Repo`                    | `RootedBySeparator`       | `/`        | `in`, `Repo`            |
//! | `\\server\share`              | `RootedByDoubleSeparator` | `//`       | `server`, `share`       |
//! | `https://github.com/Org/Repo` | `RootedByScheme`          | `https://` | `github.com`, `Org`, .. |
//! | `C:\Users`                    | `RootedByFirstPart`       | `C:`       | `Users`                 |
//! | `~/Repo/README.md`            | `RootedByVirtualMarker`   | `~`        | `Repo`, `README.md`     |

use std::fmt;
use std::path::{Path, PathBuf};

use super::LinkError;

/// Root token of the virtual address space.
pub const VIRTUAL_MARKER: &str = "~";

/// How a path is anchored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RootKind {
    #[default]
    Relative,
    RootedBySeparator,
    RootedByDoubleSeparator,
    RootedByScheme,
    /// Drive letters (`C:`) and home markers (`~user`).
    RootedByFirstPart,
    /// The synthetic `~` address space.
    RootedByVirtualMarker,
}

/// Immutable structured path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathValue {
    kind: RootKind,
    root: String,
    segments: Vec<String>,
}

impl PathValue {
    /// The empty relative path.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The root of the virtual address space (`~`).
    pub fn virtual_root() -> Self {
        Self::from_parts(RootKind::RootedByVirtualMarker, VIRTUAL_MARKER, Vec::new())
    }

    /// Parse a path or URL string.
    ///
    /// Both `/` and `\` separate segments, except in URLs where only `/` does.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();

        if let Some(len) = scheme_prefix_len(raw) {
            let (root, rest) = raw.split_at(len);
            return Self::from_parts(RootKind::RootedByScheme, root, split_segments(rest));
        }

        let normalized = raw.replace('\\', "/");
        if let Some(rest) = normalized.strip_prefix("//") {
            return Self::from_parts(RootKind::RootedByDoubleSeparator, "//", split_segments(rest));
        }
        if let Some(rest) = normalized.strip_prefix('/') {
            return Self::from_parts(RootKind::RootedBySeparator, "/", split_segments(rest));
        }

        let (first, rest) = normalized.split_once('/').unwrap_or((&normalized, ""));
        if first == VIRTUAL_MARKER {
            Self::from_parts(RootKind::RootedByVirtualMarker, first, split_segments(rest))
        } else if first.starts_with('~') || is_drive(first) {
            Self::from_parts(RootKind::RootedByFirstPart, first, split_segments(rest))
        } else {
            Self::from_parts(RootKind::Relative, "", split_segments(&normalized))
        }
    }

    /// Convert a file-system path.
    pub fn from_path(path: &Path) -> Self {
        Self::parse(&path.to_string_lossy())
    }

    fn from_parts(kind: RootKind, root: &str, segments: Vec<String>) -> Self {
        Self {
            kind,
            root: root.to_string(),
            segments,
        }
    }

    fn with_segments(&self, segments: Vec<String>) -> Self {
        Self {
            kind: self.kind,
            root: self.root.clone(),
            segments,
        }
    }

    fn relative(segments: Vec<String>) -> Self {
        Self::from_parts(RootKind::Relative, "", segments)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    #[inline]
    pub const fn kind(&self) -> RootKind {
        self.kind
    }

    /// Root token (`/`, `//`, `https://`, `C:`, `~`), empty when relative.
    #[inline]
    pub fn root(&self) -> &str {
        &self.root
    }

    #[inline]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub const fn is_rooted(&self) -> bool {
        !matches!(self.kind, RootKind::Relative)
    }

    #[inline]
    pub const fn is_relative(&self) -> bool {
        matches!(self.kind, RootKind::Relative)
    }

    #[inline]
    pub const fn is_virtual(&self) -> bool {
        matches!(self.kind, RootKind::RootedByVirtualMarker)
    }

    #[inline]
    pub const fn is_uri(&self) -> bool {
        matches!(self.kind, RootKind::RootedByScheme)
    }

    /// True for the empty relative path only. `/` is not empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.is_relative() && self.segments.is_empty()
    }

    pub fn first_segment(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    pub fn last_segment(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Extension of the last segment, without the dot.
    ///
    /// Dot-files (`.gitignore`) and dot segments have no extension.
    pub fn extension(&self) -> Option<&str> {
        let last = self.last_segment()?;
        match last.rfind('.') {
            Some(idx) if idx > 0 && idx + 1 < last.len() => Some(&last[idx + 1..]),
            _ => None,
        }
    }

    /// Case-insensitive extension test.
    pub fn has_extension(&self, extension: &str) -> bool {
        self.extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
    }

    /// Same kind and root token.
    #[inline]
    pub fn same_root(&self, other: &Self) -> bool {
        self.kind == other.kind && self.root == other.root
    }

    // ------------------------------------------------------------------------
    // Composition
    // ------------------------------------------------------------------------

    /// Append `other`. A rooted `other` replaces `self`.
    pub fn combine(&self, other: &Self) -> Self {
        if other.is_rooted() {
            return other.clone();
        }
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        self.with_segments(segments)
    }

    /// Append one segment (a `/` inside `segment` appends several).
    pub fn append_segment(&self, segment: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(split_segments(&segment.replace('\\', "/")));
        self.with_segments(segments)
    }

    /// Drop the root and the first `count` segments. The result is relative.
    pub fn remove_first_segments(&self, count: usize) -> Self {
        let count = count.min(self.segments.len());
        Self::relative(self.segments[count..].to_vec())
    }

    /// Drop the last `count` segments, keeping the root.
    pub fn remove_last_segments(&self, count: usize) -> Self {
        let keep = self.segments.len().saturating_sub(count);
        self.with_segments(self.segments[..keep].to_vec())
    }

    #[inline]
    pub fn parent(&self) -> Self {
        self.remove_last_segments(1)
    }

    /// Structural prefix test. Equal paths match.
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.same_root(prefix)
            && prefix.segments.len() <= self.segments.len()
            && self.segments.iter().zip(&prefix.segments).all(|(a, b)| a == b)
    }

    /// Relative remainder after `prefix`, if `self` starts with it.
    pub fn strip_prefix(&self, prefix: &Self) -> Option<Self> {
        self.starts_with(prefix)
            .then(|| self.remove_first_segments(prefix.segments.len()))
    }

    /// Longest common leading run. Different roots share nothing.
    pub fn common_prefix(&self, other: &Self) -> Self {
        if !self.same_root(other) {
            return Self::empty();
        }
        let shared = self
            .segments
            .iter()
            .zip(&other.segments)
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| a.clone())
            .collect();
        self.with_segments(shared)
    }

    /// Replace the extension of the last segment.
    pub fn with_extension(&self, extension: &str) -> Self {
        let Some(last) = self.last_segment() else {
            return self.clone();
        };
        let stem = match last.rfind('.') {
            Some(idx) if idx > 0 => &last[..idx],
            _ => last,
        };
        let mut segments = self.segments.clone();
        if let Some(slot) = segments.last_mut() {
            *slot = format!("{stem}.{extension}");
        }
        self.with_segments(segments)
    }

    // ------------------------------------------------------------------------
    // Dot resolution
    // ------------------------------------------------------------------------

    /// Collapse `.` and `segment/..` pairs.
    ///
    /// The first `preserve` segments are kept verbatim. Going above the
    /// remaining segments fails.
    pub fn resolve_dots(&self, preserve: usize) -> Result<Self, LinkError> {
        let preserve = preserve.min(self.segments.len());
        let mut resolved = self.segments[..preserve].to_vec();

        for segment in &self.segments[preserve..] {
            match segment.as_str() {
                "." => {}
                ".." => {
                    if resolved.len() > preserve {
                        resolved.pop();
                    } else {
                        return Err(self.escape_error());
                    }
                }
                _ => resolved.push(segment.clone()),
            }
        }

        Ok(self.with_segments(resolved))
    }

    /// Resolve dots while keeping the leading run of `.` / `..` segments.
    pub fn resolve_dots_smart(&self) -> Result<Self, LinkError> {
        self.resolve_dots(self.leading_dots())
    }

    /// Number of leading `.` / `..` segments.
    pub fn leading_dots(&self) -> usize {
        self.segments
            .iter()
            .take_while(|s| *s == "." || *s == "..")
            .count()
    }

    fn escape_error(&self) -> LinkError {
        let display = self.to_string();
        match self.kind {
            RootKind::Relative => LinkError::OutOfScope(display),
            RootKind::RootedByVirtualMarker => LinkError::AboveVirtualRoot(display),
            _ => LinkError::AboveRoot(display),
        }
    }

    /// Convert to a file-system path.
    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf::from(self.to_string())
    }
}

impl fmt::Display for PathValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self.segments.join("/");
        match self.kind {
            RootKind::Relative => f.write_str(&joined),
            RootKind::RootedBySeparator
            | RootKind::RootedByDoubleSeparator
            | RootKind::RootedByScheme => write!(f, "{}{}", self.root, joined),
            RootKind::RootedByFirstPart | RootKind::RootedByVirtualMarker => {
                if joined.is_empty() {
                    f.write_str(&self.root)
                } else {
                    write!(f, "{}/{}", self.root, joined)
                }
            }
        }
    }
}

impl From<&str> for PathValue {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<String> for PathValue {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&Path> for PathValue {
    fn from(value: &Path) -> Self {
        Self::from_path(value)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn split_segments(raw: &str) -> Vec<String> {
    raw.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Length of a URL scheme prefix (`https://`, `mailto:`), if any.
///
/// Single letters are drive letters, not schemes.
fn scheme_prefix_len(raw: &str) -> Option<usize> {
    let pos = raw.find(':')?;
    let scheme = &raw[..pos];
    let valid = pos > 1
        && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !valid {
        return None;
    }
    if raw[pos + 1..].starts_with("//") {
        Some(pos + 3)
    } else {
        Some(pos + 1)
    }
}

#[inline]
fn is_drive(part: &str) -> bool {
    let bytes = part.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

// ============================================================================
// Tests
// ============================================================================
