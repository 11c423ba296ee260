/// Match a route pattern against a request path.
///
/// Both sides ignore one leading and one trailing `/`, then are compared
/// segment by segment, left to right. Segment counts must be identical. A
/// `*` segment matches any single segment, a `:name` segment captures the
/// value into `params`, anything else compares literally, case-sensitively.
///
/// `params` is cleared when the attempt starts and again when it fails, so
/// it never carries captures of a rejected attempt.
pub(crate) fn matches(pattern: &str, path: &str, params: &mut Vec<(String, String)>) -> bool {
    params.clear();

    let pattern = trim(pattern);
    let path = trim(path);

    let mut names = pattern.split('/');
    let mut segments = path.split('/');

    loop {
        match (names.next(), segments.next()) {
            (None, None) => return true,
            (Some("*"), Some(_)) => {}
            (Some(name), Some(segment)) if is_param(name) => {
                params.push((name[1..].to_owned(), segment.to_owned()));
            }
            (Some(name), Some(segment)) if name == segment => {}
            _ => {
                params.clear();
                return false;
            }
        }
    }
}

/// A `:` alone is a literal segment, not a parameter.
#[inline]
fn is_param(name: &str) -> bool {
    name.len() > 1 && name.starts_with(':')
}

#[inline]
fn trim(path: &str) -> &str {
    let path = path.strip_prefix('/').unwrap_or(path);
    path.strip_suffix('/').unwrap_or(path)
}
