//! Path utility functions for normalization and comparison.

use std::path::{Component, Path, PathBuf};

/// Normalize a path by processing `.` and `..` components lexically.
/// This does not access the filesystem and does not follow symlinks.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Keep the `..` when there is nothing left to pop
                if !result.pop() {
                    result.push(component);
                }
            }
            _ => result.push(component),
        }
    }
    result
}

/// Check if a path is under a given directory by comparing normalized path components.
/// A directory counts as being under itself.
pub fn is_path_under(path: &Path, dir: &Path) -> bool {
    let normalized_path = normalize_path(path);
    let normalized_dir = normalize_path(dir);

    let path_components: Vec<_> = normalized_path.components().collect();
    let dir_components: Vec<_> = normalized_dir.components().collect();

    if path_components.len() < dir_components.len() {
        return false;
    }

    dir_components
        .iter()
        .zip(path_components.iter())
        .all(|(d, p)| d == p)
}

/// Path of `path` relative to `base`.
///
/// Returns `None` when no relative path exists (e.g., different drive letters on Windows).
pub fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    let result = pathdiff::diff_paths(path, base)?;

    if result.is_absolute() {
        return None;
    }

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_with_dot() {
        assert_eq!(
            normalize_path(Path::new("/build/./out/./lib")),
            PathBuf::from("/build/out/lib")
        );
    }

    #[test]
    fn test_normalize_path_with_parent_dir() {
        assert_eq!(
            normalize_path(Path::new("/build/out/../package")),
            PathBuf::from("/build/package")
        );
    }

    #[test]
    fn test_normalize_path_relative() {
        assert_eq!(
            normalize_path(Path::new("./package")),
            PathBuf::from("package")
        );
        assert_eq!(normalize_path(Path::new("./././.")), PathBuf::from(""));
    }

    #[test]
    fn test_is_path_under() {
        assert!(is_path_under(
            Path::new("/build/package"),
            Path::new("/build")
        ));
        assert!(is_path_under(Path::new("/build"), Path::new("/build")));
        assert!(!is_path_under(Path::new("/build2"), Path::new("/build")));
        assert!(!is_path_under(
            Path::new("/build/package/../../etc"),
            Path::new("/build")
        ));
    }

    #[test]
    fn test_is_path_under_relative_root() {
        assert!(is_path_under(Path::new("package"), Path::new(".")));
    }

    #[test]
    fn test_relative_to() {
        assert_eq!(
            relative_to(Path::new("/build/lib/libfoo.a"), Path::new("/build")),
            Some(PathBuf::from("lib/libfoo.a"))
        );
        assert_eq!(
            relative_to(Path::new("/build"), Path::new("/build")),
            Some(PathBuf::from(""))
        );
    }
}
