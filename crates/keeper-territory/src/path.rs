//! Path normalization into root-relative, forward-slash form.

use std::path::Path;

/// Normalize `path` into a forward-slash path relative to `root`.
///
/// - Backslashes become `/`
/// - Leading `./` and interior `.` segments are dropped
/// - Absolute paths are rebased against `root`
/// - `..` segments are resolved lexically
///
/// Returns `None` when the path lies outside `root`, escapes it via `..`,
/// or collapses to nothing.
pub fn normalize_path(path: &str, root: &Path) -> Option<String> {
    let unified = path.replace('\\', "/");
    let relative = if is_absolute(&unified) {
        let root = root.to_string_lossy().replace('\\', "/");
        let root = root.trim_end_matches('/');
        let rest = unified.strip_prefix(root)?;
        // `/repo-other/x` must not match root `/repo`
        if !rest.is_empty() && !rest.starts_with('/') {
            return None;
        }
        rest.to_string()
    } else {
        unified
    };
    clean_segments(&relative)
}

/// Normalize an already-relative path without a root.
///
/// Absolute input has no frame of reference and yields `None`.
pub(crate) fn normalize_relative(path: &str) -> Option<String> {
    let unified = path.replace('\\', "/");
    if is_absolute(&unified) {
        return None;
    }
    clean_segments(&unified)
}

fn is_absolute(unified: &str) -> bool {
    unified.starts_with('/') || Path::new(unified).is_absolute() || has_drive_prefix(unified)
}

fn has_drive_prefix(unified: &str) -> bool {
    let bytes = unified.as_bytes();
    bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/'
}

fn clean_segments(raw: &str) -> Option<String> {
    let mut out: Vec<&str> = Vec::new();
    for segment in raw.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                let _ = out.pop()?;
            }
            other => out.push(other),
        }
    }
    if out.is_empty() {
        None
    } else {
        Some(out.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "/repo";

    fn norm(p: &str) -> Option<String> {
        normalize_path(p, Path::new(ROOT))
    }

    #[test]
    fn relative_passes_through() {
        assert_eq!(norm("svc1/main.py").as_deref(), Some("svc1/main.py"));
    }

    #[test]
    fn strips_dot_prefix() {
        assert_eq!(norm("./svc1/main.py").as_deref(), Some("svc1/main.py"));
        assert_eq!(norm("././a/./b").as_deref(), Some("a/b"));
    }

    #[test]
    fn converts_backslashes() {
        assert_eq!(norm("svc1\\src\\main.py").as_deref(), Some("svc1/src/main.py"));
    }

    #[test]
    fn rebases_absolute_under_root() {
        assert_eq!(norm("/repo/svc1/main.py").as_deref(), Some("svc1/main.py"));
    }

    #[test]
    fn root_with_trailing_slash() {
        let got = normalize_path("/repo/a.txt", Path::new("/repo/"));
        assert_eq!(got.as_deref(), Some("a.txt"));
    }

    #[test]
    fn absolute_outside_root_is_none() {
        assert_eq!(norm("/elsewhere/main.py"), None);
        assert_eq!(norm("/repository/main.py"), None);
    }

    #[test]
    fn root_itself_is_none() {
        assert_eq!(norm("/repo"), None);
        assert_eq!(norm("."), None);
        assert_eq!(norm(""), None);
    }

    #[test]
    fn parent_segments_resolve_lexically() {
        assert_eq!(norm("a/b/../c").as_deref(), Some("a/c"));
        assert_eq!(norm("../outside"), None);
        assert_eq!(norm("/repo/../etc/passwd"), None);
    }

    #[test]
    fn relative_helper_rejects_absolute() {
        assert_eq!(normalize_relative("/abs/path"), None);
        assert_eq!(normalize_relative("C:/abs/path"), None);
        assert_eq!(normalize_relative("./x").as_deref(), Some("x"));
    }
}
