//! Path normalization for user input and stored paths.
//!
//! Every path that reaches the filesystem or the store goes through here
//! first, so ingestion and lookup agree on one spelling:
//! - backslashes become forward slashes
//! - repeated slashes collapse to one
//! - a trailing slash is dropped (except for a bare root like `/` or `C:/`)
//! - `.` and `..` components are resolved lexically

use crate::error::PathError;
use std::path::{Component, Path, PathBuf};

/// Replaces every backslash with a forward slash.
#[must_use]
pub fn to_forward_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Normalizes the spelling of a user-supplied path without touching the
/// filesystem.
///
/// # Errors
///
/// Returns `PathError::Empty` for empty or whitespace-only input.
///
/// # Example
///
/// ```
/// use wordex::paths::normalize_input;
///
/// assert_eq!(normalize_input(r"C:\docs\\reports\").unwrap(), "C:/docs/reports");
/// assert_eq!(normalize_input("D:").unwrap(), "D:/");
/// assert!(normalize_input("   ").is_err());
/// ```
pub fn normalize_input(input: &str) -> Result<String, PathError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(PathError::Empty);
    }

    let mut normalized = String::with_capacity(trimmed.len());
    let mut prev_slash = false;
    for c in trimmed.chars() {
        let c = if c == '\\' { '/' } else { c };
        if c == '/' {
            if prev_slash {
                continue;
            }
            prev_slash = true;
        } else {
            prev_slash = false;
        }
        normalized.push(c);
    }

    if normalized.len() > 1 && normalized.ends_with('/') && !is_drive_root(&normalized) {
        normalized.pop();
    }

    // "C:" alone means the drive root
    if normalized.len() == 2 && normalized.as_bytes()[1] == b':' {
        normalized.push('/');
    }

    Ok(normalized)
}

fn is_drive_root(s: &str) -> bool {
    s.len() == 3 && s.as_bytes()[1] == b':'
}

/// Suggests a corrected spelling for a path the user typed.
#[must_use]
pub fn suggest_correction(input: &str) -> String {
    let mut hints = Vec::new();

    if input.contains('\\') {
        hints.push("use forward slashes");
    }
    if input.contains("//") || input.contains("\\\\") {
        hints.push("remove duplicate slashes");
    }
    if input.len() > 1 && (input.ends_with('/') || input.ends_with('\\')) {
        hints.push("drop the trailing slash");
    }
    if input.contains(['<', '>', '"', '|', '?', '*']) {
        hints.push("remove characters < > \" | ? *");
    }

    let corrected = normalize_input(input).unwrap_or_default();
    if hints.is_empty() {
        format!("check that '{corrected}' exists")
    } else {
        format!("{}: try '{corrected}'", hints.join(", "))
    }
}

/// Normalizes input and makes it absolute, resolving `.` and `..`.
///
/// # Errors
///
/// Returns `PathError::Empty` for empty input, `PathError::NotFound`
/// if the current directory cannot be determined for a relative path.
pub fn validate_and_get_path(input: &str) -> Result<PathBuf, PathError> {
    let normalized = normalize_input(input)?;
    let absolute = std::path::absolute(Path::new(&normalized)).map_err(|_| {
        PathError::NotFound {
            path: input.to_string(),
            suggestion: suggest_correction(input),
        }
    })?;
    Ok(normalize_components(&absolute))
}

/// Validates that input names an existing, readable directory and returns
/// its canonical form.
///
/// # Errors
///
/// Returns the matching `PathError` variant for empty, missing,
/// non-directory, or unreadable paths.
pub fn validate_directory(input: &str) -> Result<PathBuf, PathError> {
    let path = validate_and_get_path(input)?;
    let shown = to_forward_slashes(&path.to_string_lossy());

    if !path.exists() {
        return Err(PathError::NotFound {
            path: shown,
            suggestion: suggest_correction(input),
        });
    }
    if !path.is_dir() {
        return Err(PathError::NotADirectory { path: shown });
    }
    if std::fs::read_dir(&path).is_err() {
        return Err(PathError::Unreadable { path: shown });
    }

    Ok(dunce::canonicalize(&path).unwrap_or(path))
}

/// Resolves `.` and `..` components lexically.
fn normalize_components(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Never pop past the root or a prefix
                if components
                    .last()
                    .is_some_and(|c| matches!(c, Component::Normal(_)))
                {
                    components.pop();
                } else if components.is_empty() {
                    components.push(component);
                }
            }
            _ => components.push(component),
        }
    }

    components.iter().collect()
}

/// Extension of a file name: the text after the last dot, lowercased.
///
/// Returns `None` when there is no dot, the dot is the first character
/// (hidden files like `.bashrc`), or the dot is the last character.
#[must_use]
pub fn extension_of(file_name: &str) -> Option<String> {
    let idx = file_name.rfind('.')?;
    if idx == 0 || idx + 1 == file_name.len() {
        return None;
    }
    Some(file_name[idx + 1..].to_lowercase())
}

/// Last path segment after normalizing slashes.
#[must_use]
pub fn file_name_of(path: &str) -> String {
    let normalized = to_forward_slashes(path);
    let trimmed = normalized.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => trimmed[idx + 1..].to_string(),
        None => trimmed.to_string(),
    }
}
