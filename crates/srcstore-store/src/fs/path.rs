//! Mapping identifiers to single path components.

use crate::StoreError;
use std::path::Path;

/// Escapes an identifier so it occupies exactly one path component.
///
/// `%` and `/` are always escaped. A leading dot is escaped too, so no
/// identifier maps to `.`, `..` or a hidden entry.
pub fn escape_component(id: &str) -> String {
    let escaped = id.replace('%', "%25").replace('/', "%2F");
    match escaped.strip_prefix('.') {
        Some(rest) => format!("%2E{}", rest),
        None => escaped,
    }
}

/// Inverse of [`escape_component`].
pub fn unescape_component(component: &str) -> Result<String, StoreError> {
    let mut out = String::with_capacity(component.len());
    let mut chars = component.chars();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let code: String = chars.by_ref().take(2).collect();
        match code.to_ascii_uppercase().as_str() {
            "25" => out.push('%'),
            "2F" => out.push('/'),
            "2E" => out.push('.'),
            _ => {
                return Err(StoreError::InvalidId(format!(
                    "bad escape %{} in {:?}",
                    code, component
                )))
            }
        }
    }

    Ok(out)
}

/// Names of the visible subdirectories of `dir`.
///
/// A missing `dir` is reported as [`StoreError::NotFound`] so callers can
/// tell an absent collection from a broken one.
pub(crate) async fn child_dirs(dir: &Path) -> Result<Vec<String>, StoreError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(StoreError::NotFound(dir.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };

    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().into_string().map_err(|raw| {
            StoreError::InvalidId(format!("non UTF-8 entry {:?} in {}", raw, dir.display()))
        })?;
        // Skip temp and hidden entries
        if name.starts_with('.') {
            continue;
        }
        if entry.file_type().await?.is_dir() {
            names.push(name);
        }
    }

    Ok(names)
}
