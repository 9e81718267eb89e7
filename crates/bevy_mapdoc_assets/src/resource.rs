//! Resource locators and relative source resolution.

use std::fmt;
use std::path::{Path, PathBuf};

use normalize_path::NormalizePath;

/// Opaque reference to an image or animation file.
///
/// Locators are relative to the map directory (or absolute); the pools resolve
/// them against the registered search directories only when asked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceLocator(PathBuf);

impl ResourceLocator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Lower-cased extension without the dot, if any.
    pub fn extension(&self) -> Option<String> {
        self.0
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
    }
}

impl fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<&str> for ResourceLocator {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Image locator plus the pixel shift applied when it is drawn.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageLocation {
    pub locator: ResourceLocator,
    pub x_shift: i32,
    pub y_shift: i32,
}

impl ImageLocation {
    pub fn new(locator: ResourceLocator) -> Self {
        Self {
            locator,
            x_shift: 0,
            y_shift: 0,
        }
    }

    pub fn with_shift(mut self, x_shift: i32, y_shift: i32) -> Self {
        self.x_shift = x_shift;
        self.y_shift = y_shift;
        self
    }
}

/// Resolve a `source` attribute against the document that declares it.
///
/// A relative source inside a document that has a directory component becomes
/// `dirname(document)/source` with `.` and `..` collapsed; anything else is
/// used unchanged. Image sources
/// and animation sources both go through here.
///
/// Joined paths starting with `..` are kept as written.
pub fn resolve_source(document: &Path, source: &str) -> ResourceLocator {
    let source_path = Path::new(source);
    if source_path.is_relative()
        && let Some(parent) = document.parent()
        && !parent.as_os_str().is_empty()
    {
        let joined = parent.join(source_path);
        if joined.starts_with("..") {
            return ResourceLocator::new(joined);
        }
        return ResourceLocator::new(joined.normalize());
    }
    ResourceLocator::new(source_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_source_joins_document_directory() {
        let locator = resolve_source(Path::new("objects/knight/knight.xml"), "idle.png");
        assert_eq!(locator.path(), Path::new("objects/knight/idle.png"));
    }

    #[test]
    fn test_parent_references_are_collapsed() {
        let locator = resolve_source(Path::new("objects/knight/knight.xml"), "../shared/./idle.png");
        assert_eq!(locator.path(), Path::new("objects/shared/idle.png"));
    }

    #[test]
    fn test_leading_parent_reference_is_kept() {
        let locator = resolve_source(Path::new("../maps/objects/walk.xml"), "walk_0.png");
        assert_eq!(locator.path(), Path::new("../maps/objects/walk_0.png"));
    }

    #[test]
    fn test_document_without_directory_keeps_source() {
        let locator = resolve_source(Path::new("knight.xml"), "idle.png");
        assert_eq!(locator.path(), Path::new("idle.png"));
    }

    #[test]
    fn test_absolute_source_is_unchanged() {
        let locator = resolve_source(Path::new("objects/knight.xml"), "/shared/idle.png");
        assert_eq!(locator.path(), Path::new("/shared/idle.png"));
    }

    #[test]
    fn test_extension_is_lowercased() {
        assert_eq!(ResourceLocator::from("walk/ANIM.XML").extension().as_deref(), Some("xml"));
        assert_eq!(ResourceLocator::from("walk/anim").extension(), None);
    }
}
