//! Path utilities for destination naming

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Destination rename applied so the container matches the source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionChange {
    pub requested: PathBuf,
    pub corrected: PathBuf,
}

/// Path utilities for destination handling
pub struct PathUtils;

impl PathUtils {
    /// Make the destination's extension match the source's
    ///
    /// A missing extension is appended, a different one is substituted. When
    /// the source has no extension the destination is left alone.
    pub fn normalize_extension(
        destination: &Path,
        source_extension: Option<&str>,
    ) -> (PathBuf, Option<ExtensionChange>) {
        let source_extension = match source_extension {
            Some(ext) if !ext.is_empty() => ext,
            _ => return (destination.to_path_buf(), None),
        };

        let matches = destination
            .extension()
            .map(|ext| ext.to_string_lossy() == source_extension)
            .unwrap_or(false);
        if matches {
            return (destination.to_path_buf(), None);
        }

        let corrected = destination.with_extension(source_extension);
        let change = ExtensionChange {
            requested: destination.to_path_buf(),
            corrected: corrected.clone(),
        };
        (corrected, Some(change))
    }

    /// Default output name: `<prefix><name>` in `base_dir`
    pub fn default_destination(prefix: &str, name: &str, base_dir: &Path) -> PathBuf {
        base_dir.join(format!("{}{}", prefix, Self::sanitize_file_name(name)))
    }

    /// Append `.ext` to the file name, keeping any dots already in it
    ///
    /// Titles such as `vol. 2` are not file extensions, so
    /// [`Path::with_extension`] would cut them short.
    pub fn append_extension(path: &Path, ext: &str) -> PathBuf {
        let mut name = path.as_os_str().to_os_string();
        name.push(".");
        name.push(ext);
        PathBuf::from(name)
    }

    /// Replace path separators so a title can be used as a file name
    pub fn sanitize_file_name(name: &str) -> String {
        let cleaned: String = name
            .trim()
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
            .collect();
        if cleaned.is_empty() {
            "video".to_string()
        } else {
            cleaned
        }
    }

    /// Resolve a relative path against `base_dir`
    pub fn absolutize(path: &Path, base_dir: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_mismatched_extension() {
        let (path, change) = PathUtils::normalize_extension(Path::new("out.mp4"), Some("mkv"));
        assert_eq!(path, PathBuf::from("out.mkv"));
        let change = change.unwrap();
        assert_eq!(change.requested, PathBuf::from("out.mp4"));
        assert_eq!(change.corrected, PathBuf::from("out.mkv"));
    }

    #[test]
    fn test_appends_missing_extension() {
        let (path, change) = PathUtils::normalize_extension(Path::new("out"), Some("mkv"));
        assert_eq!(path, PathBuf::from("out.mkv"));
        assert!(change.is_some());
    }

    #[test]
    fn test_matching_extension_is_untouched() {
        let (path, change) =
            PathUtils::normalize_extension(Path::new("/videos/out.mkv"), Some("mkv"));
        assert_eq!(path, PathBuf::from("/videos/out.mkv"));
        assert!(change.is_none());
    }

    #[test]
    fn test_source_without_extension() {
        let (path, change) = PathUtils::normalize_extension(Path::new("out.mp4"), None);
        assert_eq!(path, PathBuf::from("out.mp4"));
        assert!(change.is_none());
    }

    #[test]
    fn test_default_destination() {
        let path = PathUtils::default_destination("ten-hours-of-", "clip.mp4", Path::new("/work"));
        assert_eq!(path, PathBuf::from("/work/ten-hours-of-clip.mp4"));
    }

    #[test]
    fn test_default_destination_sanitizes_titles() {
        let path = PathUtils::default_destination("ten-hours-of-", "AC/DC live", Path::new("/w"));
        assert_eq!(path, PathBuf::from("/w/ten-hours-of-AC_DC live"));
        assert_eq!(PathUtils::sanitize_file_name("  "), "video");
    }

    #[test]
    fn test_append_extension_keeps_dotted_titles() {
        let titled =
            PathUtils::default_destination("ten-hours-of-", "Lofi beats vol. 2", Path::new("/w"));
        let path = PathUtils::append_extension(&titled, "webm");
        assert_eq!(path, PathBuf::from("/w/ten-hours-of-Lofi beats vol. 2.webm"));

        // Already matching, so the concat step leaves it alone
        let (normalized, change) = PathUtils::normalize_extension(&path, Some("webm"));
        assert_eq!(normalized, path);
        assert!(change.is_none());
    }

    #[test]
    fn test_absolutize() {
        assert_eq!(
            PathUtils::absolutize(Path::new("out.mp4"), Path::new("/work")),
            PathBuf::from("/work/out.mp4")
        );
        assert_eq!(
            PathUtils::absolutize(Path::new("/abs/out.mp4"), Path::new("/work")),
            PathBuf::from("/abs/out.mp4")
        );
    }
}
