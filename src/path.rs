use crate::utils::error::{AppError, AppResult};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Separator between folder segments in the canonical string form.
pub const SEPARATOR: char = '/';

/// Maximum folder nesting depth accepted by the normalizer.
pub const MAX_DEPTH: usize = 16;

/// A normalized folder path: an ordered sequence of non-empty segments.
///
/// The empty sequence is the root. Two raw strings that normalize to the
/// same segments denote the same folder; the canonical joined form is the
/// storage key everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FolderPath {
    segments: Vec<String>,
}

impl FolderPath {
    /// The root path (no segments, canonical form `""`).
    pub fn root() -> Self {
        Self { segments: Vec::new() }
    }

    /// Normalizes a raw path string.
    ///
    /// Splits on `/`, trims whitespace from each segment and drops empty
    /// segments, so `" AI // Coding /"` and `"AI/Coding"` are the same
    /// folder. Fails when the result nests deeper than [`MAX_DEPTH`].
    pub fn parse(raw: &str) -> AppResult<Self> {
        let segments: Vec<String> = raw
            .split(SEPARATOR)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if segments.len() > MAX_DEPTH {
            return Err(AppError::InvalidArgument(format!(
                "folder path '{}' exceeds maximum depth of {}",
                raw, MAX_DEPTH
            )));
        }

        Ok(Self { segments })
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Canonical string form, used as the storage key. Root is `""`.
    pub fn as_str(&self) -> String {
        self.segments.join("/")
    }

    /// Parent path (drops the last segment). Root has no parent.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Every proper ancestor, nearest-root first: for `a/b/c` yields
    /// `a` and `a/b`.
    pub fn ancestors(&self) -> Vec<Self> {
        (1..self.segments.len())
            .map(|n| Self {
                segments: self.segments[..n].to_vec(),
            })
            .collect()
    }

    /// True when `self` is a proper ancestor-prefix of `other`.
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        other.segments.len() > self.segments.len()
            && other.segments[..self.segments.len()] == self.segments[..]
    }
}

impl fmt::Display for FolderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for FolderPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_str())
    }
}

impl<'de> Deserialize<'de> for FolderPath {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["AI/Coding/Python", "  AI / Coding ", "a//b/", "", "/"] {
            let once = FolderPath::parse(raw).unwrap();
            let twice = FolderPath::parse(&once.as_str()).unwrap();
            assert_eq!(once, twice, "raw: {raw:?}");
        }
    }

    #[test]
    fn trims_and_drops_empty_segments() {
        let path = FolderPath::parse(" AI // Coding /").unwrap();
        assert_eq!(path.as_str(), "AI/Coding");
        assert_eq!(path.segments(), ["AI", "Coding"]);
    }

    #[test]
    fn empty_and_separator_only_normalize_to_root() {
        assert!(FolderPath::parse("").unwrap().is_root());
        assert!(FolderPath::parse("///").unwrap().is_root());
        assert_eq!(FolderPath::parse("  ").unwrap().as_str(), "");
    }

    #[test]
    fn rejects_excessive_depth() {
        let raw = vec!["x"; MAX_DEPTH + 1].join("/");
        let err = FolderPath::parse(&raw).unwrap_err();
        assert_eq!(err.kind(), "invalid_argument");

        let at_limit = vec!["x"; MAX_DEPTH].join("/");
        assert!(FolderPath::parse(&at_limit).is_ok());
    }

    #[test]
    fn parent_and_ancestors() {
        let path = FolderPath::parse("AI/Coding/Python").unwrap();
        assert_eq!(path.parent().unwrap().as_str(), "AI/Coding");
        assert!(FolderPath::root().parent().is_none());

        let ancestors: Vec<String> =
            path.ancestors().iter().map(FolderPath::as_str).collect();
        assert_eq!(ancestors, ["AI", "AI/Coding"]);
    }

    #[test]
    fn ancestor_prefix_check() {
        let ai = FolderPath::parse("AI").unwrap();
        let coding = FolderPath::parse("AI/Coding").unwrap();
        let aix = FolderPath::parse("AIX").unwrap();
        assert!(ai.is_ancestor_of(&coding));
        assert!(!ai.is_ancestor_of(&ai));
        assert!(!ai.is_ancestor_of(&aix));
        assert!(FolderPath::root().is_ancestor_of(&ai));
    }
}
