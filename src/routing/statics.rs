use std::path::{Path, PathBuf};

/// Resolve a request path against the static mapping.
///
/// Returns the file to serve when `path` falls under `prefix`. The remainder
/// must be non-empty, must not end with `/` and must not contain a backslash
/// or `..`; the traversal guard runs before any filesystem access.
pub(crate) fn locate(prefix: &str, dir: &Path, path: &str) -> Option<PathBuf> {
    let rest = match prefix.ends_with('/') {
        true => path.strip_prefix(prefix)?,
        false => path.strip_prefix(prefix)?.strip_prefix('/')?,
    };

    if rest.is_empty() || rest.ends_with('/') {
        return None;
    }
    if rest.contains('\\') || rest.contains("..") {
        return None;
    }

    Some(dir.join(rest))
}
