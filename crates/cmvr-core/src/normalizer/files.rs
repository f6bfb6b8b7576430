//! Uploaded-file references
//!
//! Copyright (c) 2025 CMVR Team
//! Licensed under the Apache-2.0 license

use super::fallback::first_text;
use crate::types::FileReference;
use serde_json::Value;

/// Last path segment with any query string or fragment removed
fn display_name(location: &str) -> String {
    let without_query = location
        .split(['?', '#'])
        .next()
        .unwrap_or(location);
    without_query
        .trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Normalize one file entry; needs a storage path or a URI
///
/// A bare string is taken as a storage path.
pub fn normalize_file(entry: &Value) -> Option<FileReference> {
    let (path, uri, name, mime_type) = match entry {
        Value::String(s) => (s.trim().to_string(), String::new(), String::new(), String::new()),
        Value::Object(_) => (
            first_text(entry, &["path", "storagePath"]),
            first_text(entry, &["uri", "url"]),
            first_text(entry, &["name", "fileName"]),
            first_text(entry, &["mimeType", "type"]),
        ),
        _ => return None,
    };

    if path.is_empty() && uri.is_empty() {
        return None;
    }

    let name = if !name.is_empty() {
        name
    } else if !path.is_empty() {
        display_name(&path)
    } else {
        display_name(&uri)
    };

    let non_empty = |s: String| (!s.is_empty()).then_some(s);
    Some(FileReference {
        name,
        path: non_empty(path),
        uri: non_empty(uri),
        mime_type: non_empty(mime_type),
    })
}

/// Normalize a list of file entries, dropping those without a location
pub fn normalize_files(entries: Option<&Value>) -> Vec<FileReference> {
    entries
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(normalize_file).collect())
        .unwrap_or_default()
}
