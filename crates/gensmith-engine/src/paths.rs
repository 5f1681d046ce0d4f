use std::path::{Component, Path, PathBuf};

/// Normalize a relative path, dropping `.` segments.
///
/// Returns `None` for absolute paths, paths with a prefix, paths containing
/// `..`, and paths that normalize to nothing.
pub(crate) fn normalize_relative(path: &str) -> Option<PathBuf> {
    let mut normalized = PathBuf::new();
    for component in Path::new(path).components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if normalized.as_os_str().is_empty() {
        None
    } else {
        Some(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_relative_paths() {
        assert_eq!(normalize_relative("a/b.txt"), Some(PathBuf::from("a/b.txt")));
        assert_eq!(normalize_relative("./a/./b"), Some(PathBuf::from("a/b")));
    }

    #[test]
    fn test_rejects_escaping_paths() {
        assert_eq!(normalize_relative("/etc/passwd"), None);
        assert_eq!(normalize_relative("../x"), None);
        assert_eq!(normalize_relative("a/../../x"), None);
        assert_eq!(normalize_relative(""), None);
        assert_eq!(normalize_relative("."), None);
    }
}
