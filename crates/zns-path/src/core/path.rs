//! Path utilities for namespace paths.
//!
//! Provides validation, joining, and decomposition. Every function here is
//! pure string work; nothing touches the service.

use super::error::NamespaceError;

/// Separator between path segments.
pub const PATH_SEPARATOR: char = '/';

/// The root path. It always exists and is never created or deleted.
pub const ROOT_PATH: &str = "/";

/// Validate that a path is well-formed.
///
/// Rejects empty paths, relative paths, trailing separators, empty segments,
/// `.`/`..` segments, and characters the service refuses to store.
pub fn validate_path(path: &str) -> Result<(), NamespaceError> {
    check_path(path, path)
}

/// Validate a path that may be handed to a sequential create.
///
/// The service appends a sequence number to sequential nodes, so the path is
/// checked as if that number were already present. This lets `"/queue/"`
/// through when `sequential` is set.
pub fn validate_sequential_path(path: &str, sequential: bool) -> Result<(), NamespaceError> {
    if sequential {
        check_path(&format!("{}1", path), path)
    } else {
        check_path(path, path)
    }
}

fn check_path(path: &str, reported: &str) -> Result<(), NamespaceError> {
    let invalid = |reason: String| Err(NamespaceError::invalid_path(reported, reason));

    if path.is_empty() {
        return invalid(String::from("path length must be > 0"));
    }
    if !path.starts_with(PATH_SEPARATOR) {
        return invalid(String::from("path must start with / character"));
    }
    if path == ROOT_PATH {
        return Ok(());
    }
    if path.ends_with(PATH_SEPARATOR) {
        return invalid(String::from("path must not end with / character"));
    }

    let chars: Vec<char> = path.chars().collect();
    for i in 1..chars.len() {
        let c = chars[i];
        let last = chars[i - 1];
        let segment_ends = i + 1 == chars.len() || chars[i + 1] == PATH_SEPARATOR;

        if c == '\0' {
            return invalid(format!("null character not allowed @{}", i));
        } else if c == PATH_SEPARATOR && last == PATH_SEPARATOR {
            return invalid(format!("empty node name specified @{}", i));
        } else if c == '.' && last == '.' {
            // chars[0] is the separator, so a second dot sits at i >= 2
            if chars[i - 2] == PATH_SEPARATOR && segment_ends {
                return invalid(format!("relative paths not allowed @{}", i));
            }
        } else if c == '.' {
            if last == PATH_SEPARATOR && segment_ends {
                return invalid(format!("relative paths not allowed @{}", i));
            }
        } else if is_forbidden_char(c) {
            return invalid(format!("invalid character @{}", i));
        }
    }

    Ok(())
}

fn is_forbidden_char(c: char) -> bool {
    matches!(
        c,
        '\u{0001}'..='\u{001f}' | '\u{007f}'..='\u{009f}' | '\u{e000}'..='\u{f8ff}' | '\u{fff0}'..='\u{ffff}'
    )
}

/// Join a parent and a child into a single well-formed path.
///
/// Either side may carry leading, trailing, or repeated separators; they are
/// collapsed so the result has exactly one separator between segments and
/// none at the end. Joining two empty fragments yields the root.
pub fn make_path(parent: &str, child: &str) -> String {
    make_path_all(parent, [child])
}

/// Join a parent with any number of child fragments.
pub fn make_path_all<I, S>(parent: &str, children: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut path = String::with_capacity(parent.len() + 16);
    push_segments(&mut path, parent);
    for child in children {
        push_segments(&mut path, child.as_ref());
    }

    if path.is_empty() {
        path.push(PATH_SEPARATOR);
    }
    path
}

fn push_segments(path: &mut String, fragment: &str) {
    for segment in fragment.split(PATH_SEPARATOR).filter(|s| !s.is_empty()) {
        path.push(PATH_SEPARATOR);
        path.push_str(segment);
    }
}

/// Get the parent path of a given path. The root is its own parent.
pub fn parent_path(path: &str) -> &str {
    match path.rfind(PATH_SEPARATOR) {
        Some(0) | None => ROOT_PATH,
        Some(pos) => &path[..pos],
    }
}

/// Get the last segment of a path (empty for the root).
pub fn node_name(path: &str) -> &str {
    match path.rfind(PATH_SEPARATOR) {
        Some(pos) => &path[pos + 1..],
        None => path,
    }
}

/// Split a path into its parent and last segment.
pub fn split_path(path: &str) -> (&str, &str) {
    (parent_path(path), node_name(path))
}

/// Check if a path is at or under a given base path.
pub fn is_under(path: &str, base: &str) -> bool {
    if base == ROOT_PATH {
        return path.starts_with(PATH_SEPARATOR);
    }

    path.starts_with(base)
        && (path.len() == base.len() || path.as_bytes()[base.len()] == PATH_SEPARATOR as u8)
}

/// Iterate the successive prefixes of a well-formed path, shortest first.
///
/// `"/a/b/c"` yields `"/a"`, `"/a/b"`, `"/a/b/c"`. The root yields nothing.
pub fn path_prefixes(path: &str) -> impl Iterator<Item = &str> + '_ {
    path.match_indices(PATH_SEPARATOR)
        .map(|(pos, _)| pos)
        .filter(|&pos| pos > 0)
        .map(move |pos| &path[..pos])
        .chain(Some(path).filter(|p| *p != ROOT_PATH))
}
