//! Mapping of request paths onto filesystem roots

use std::path::{Path, PathBuf};

/// Join an untrusted, percent-decoded relative path onto `root`.
///
/// Empty and `.` segments are dropped and `..` pops the previous segment.
/// Returns `None` when the path would climb above `root` or contains a
/// segment that is not a plain file name (backslash or NUL).
///
/// Symlinks inside `root` are followed; only the lexical path is checked.
///
/// # Examples
/// ```
/// use std::path::{Path, PathBuf};
/// use vidserve::handler::resolve::resolve_under;
///
/// let root = Path::new("./videos");
/// assert_eq!(resolve_under(root, "a/../clip.mp4"), Some(PathBuf::from("./videos/clip.mp4")));
/// assert_eq!(resolve_under(root, "../etc/passwd"), None);
/// ```
pub fn resolve_under(root: &Path, relative: &str) -> Option<PathBuf> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            s if s.contains(['\\', '\0']) => return None,
            s => segments.push(s),
        }
    }

    let mut path = root.to_path_buf();
    path.extend(segments);
    Some(path)
}

/// Lexically clean an absolute request path for use in a `Location` header.
///
/// Repeated slashes collapse, `.` segments drop and `..` pops (never above
/// `/`). The result always starts with exactly one slash, so it can never be
/// read as a scheme-relative `//host` URL. A trailing slash is kept.
pub fn clean_path(raw: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in raw.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let mut cleaned = format!("/{}", segments.join("/"));
    if raw.ends_with('/') && !cleaned.ends_with('/') {
        cleaned.push('/');
    }
    cleaned
}
