use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Resolve an archive entry name against `base`, refusing anything that lands outside it.
///
/// Backslashes count as separators. The check is lexical: `..` segments are
/// resolved against the joined path, and containment is tested per component,
/// so `base-evil/x` never passes as being under `base`.
pub fn sanitize_entry_path(entry_name: &str, base: impl AsRef<Path>) -> Result<PathBuf> {
    if entry_name.contains('\0') {
        return Err(Error::InvalidPath);
    }
    let base = normalize_path(base.as_ref());
    let entry = PathBuf::from(entry_name.replace('\\', "/"));

    // An absolute name would replace `base` on join.
    if entry.has_root() || entry.is_absolute() {
        return Err(Error::ZipSlip {
            resolved: normalize_path(&entry),
            entry,
        });
    }

    let resolved = normalize_path(&base.join(&entry));
    if !resolved.starts_with(&base) {
        return Err(Error::ZipSlip { entry, resolved });
    }

    Ok(resolved)
}

/// Lexically resolve `.` and `..` components.
///
/// A `..` with no normal component left to cancel is kept, so relative paths
/// that climb above their starting point still do after normalization.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                if matches!(result.components().next_back(), Some(Component::Normal(_))) {
                    result.pop();
                } else if !result.has_root() {
                    result.push("..");
                }
            }
            Component::CurDir => {}
            other => result.push(other.as_os_str()),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_base_path() -> &'static Path {
        if cfg!(windows) {
            Path::new("C:/tmp/staging")
        } else {
            Path::new("/tmp/staging")
        }
    }

    #[test]
    fn plain_entry_resolves_under_base() {
        let resolved = sanitize_entry_path("bin/tool", test_base_path()).unwrap();
        assert_eq!(resolved, test_base_path().join("bin/tool"));
    }

    #[test]
    fn directory_entry_with_trailing_separator() {
        let resolved = sanitize_entry_path("bin/", test_base_path()).unwrap();
        assert_eq!(resolved, test_base_path().join("bin"));
    }

    #[test]
    fn parent_segments_that_stay_inside_are_allowed() {
        let resolved = sanitize_entry_path("a/../b/./c.txt", test_base_path()).unwrap();
        assert_eq!(resolved, test_base_path().join("b/c.txt"));
    }

    #[test]
    fn parent_traversal_is_rejected() {
        let result = sanitize_entry_path("../../etc/password", test_base_path());
        assert!(matches!(result, Err(Error::ZipSlip { .. })));
    }

    #[test]
    fn nested_traversal_is_rejected() {
        let result = sanitize_entry_path("a/../../outside.txt", test_base_path());
        assert!(matches!(result, Err(Error::ZipSlip { .. })));
    }

    #[test]
    fn backslash_traversal_is_rejected() {
        let result = sanitize_entry_path("..\\..\\evil.txt", test_base_path());
        assert!(matches!(result, Err(Error::ZipSlip { .. })));
    }

    #[test]
    fn absolute_entry_is_rejected() {
        let result = sanitize_entry_path("/etc/passwd", test_base_path());
        assert!(matches!(result, Err(Error::ZipSlip { .. })));
    }

    #[test]
    fn sibling_with_shared_prefix_is_rejected() {
        let result = sanitize_entry_path("../staging-evil/x", test_base_path());
        assert!(matches!(result, Err(Error::ZipSlip { .. })));
    }

    #[test]
    fn null_byte_is_invalid() {
        let result = sanitize_entry_path("bad\0name", test_base_path());
        assert!(matches!(result, Err(Error::InvalidPath)));
    }

    #[test]
    fn path_normalization() {
        let result = normalize_path(Path::new("foo//bar/./baz/../qux"));
        assert_eq!(result, Path::new("foo/bar/qux"));
    }

    #[test]
    fn leading_parent_segments_survive_normalization() {
        assert_eq!(normalize_path(Path::new("../a/../../b")), Path::new("../../b"));
        assert_eq!(normalize_path(Path::new("/../a")), Path::new("/a"));
    }

    #[test]
    fn relative_base_above_cwd_keeps_entries_inside() {
        let resolved = sanitize_entry_path("f.txt", "../stage").unwrap();
        assert_eq!(resolved, Path::new("../stage/f.txt"));
        assert!(resolved.starts_with("../stage"));
    }

    #[test]
    fn relative_base_above_cwd_rejects_escapes() {
        for name in ["../f.txt", "../../f.txt", "../stage-evil/f.txt"] {
            let result = sanitize_entry_path(name, "../stage");
            assert!(matches!(result, Err(Error::ZipSlip { .. })), "{name} escaped");
        }
    }
}
