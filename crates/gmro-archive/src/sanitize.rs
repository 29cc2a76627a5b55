use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// An entry name that passed the lexical checks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SanitizedPath {
    /// Cleaned relative path. Empty when the name collapses to the root.
    pub relative: PathBuf,
    /// Number of separators in the cleaned path.
    pub depth: usize,
}

/// Lexically clean a raw entry name and reject anything that could leave the
/// destination.
///
/// Both `/` and `\` count as separators. The checks run on the cleaned form:
/// an absolute name, a NUL byte, or a leading `..` after cleaning is rejected,
/// as is a depth above `max_depth`.
pub fn sanitize_entry_name(name: &str, max_depth: usize) -> Result<SanitizedPath> {
    if name.contains('\0') {
        return Err(Error::InvalidPath { name: name.to_owned() });
    }
    if is_absolute_name(name) {
        return Err(Error::InvalidPath { name: name.to_owned() });
    }

    let parts = clean_segments(name);
    if parts.first() == Some(&"..") {
        return Err(Error::InvalidPath { name: name.to_owned() });
    }

    let depth = parts.len().saturating_sub(1);
    if depth > max_depth {
        return Err(Error::PathTooDeep {
            name: parts.join("/"),
            depth,
            limit: max_depth,
        });
    }

    Ok(SanitizedPath {
        relative: parts.iter().collect(),
        depth,
    })
}

/// Join a sanitized path onto `root` and verify the result stays inside it.
///
/// `root` must already be absolute and canonical. The joined path is
/// re-normalized and compared component-wise, so `/srv/out-evil` never passes
/// as a child of `/srv/out`. Only directories may resolve to `root` itself.
pub fn resolve_within(
    root: &Path,
    sanitized: &SanitizedPath,
    name: &str,
    allow_root: bool,
) -> Result<PathBuf> {
    let resolved = normalize_path(&root.join(&sanitized.relative));

    let inside = resolved.starts_with(root) && (resolved != root || allow_root);
    if !inside {
        return Err(Error::PathEscape {
            name: name.to_owned(),
            resolved,
        });
    }
    Ok(resolved)
}

fn is_absolute_name(name: &str) -> bool {
    if name.starts_with('/') || name.starts_with('\\') {
        return true;
    }
    // `C:foo` and `C:\foo` are drive-relative or drive-absolute on Windows.
    let bytes = name.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Split on both separators, drop empty and `.` segments, and fold `..` into
/// its preceding normal segment. Unmatched `..` segments stay at the front.
fn clean_segments(name: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = Vec::new();
    for segment in name.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }
    parts
}

/// Normalize an already-joined filesystem path.
fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::Normal(part) => result.push(part),
            Component::RootDir => result.push(component.as_os_str()),
            Component::Prefix(prefix) => result.push(prefix.as_os_str()),
            Component::CurDir => {}
        }
    }

    result
}
