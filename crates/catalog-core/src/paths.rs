//! Project path conventions.
//!
//! Paths are POSIX-style and relative to the project root. Registry keys
//! always carry a leading slash.

use crate::models::ResourceKind;

/// Extensions that mark a file as the primary definition of a resource.
const MAIN_ENTITY_EXTENSIONS: &[&str] = &["sql", "yaml", "yml"];

/// Destination extension that keeps a moved file recognizable without a
/// `type` key.
pub const PRIMARY_EXTENSION: &str = ".sql";

pub fn add_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

pub fn remove_leading_slash(path: &str) -> &str {
    path.trim_start_matches('/')
}

/// Normalize a path into a registry key.
///
/// Collapses repeated slashes, drops `.` segments and any trailing slash,
/// and guarantees a single leading slash.
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    format!("/{}", segments.join("/"))
}

/// File name without directory or extension (`/models/foo.sql` -> `foo`).
pub fn extract_file_name(path: &str) -> String {
    let file = path.rsplit('/').next().unwrap_or(path);
    match file.rfind('.') {
        Some(idx) if idx > 0 => file[..idx].to_string(),
        _ => file.to_string(),
    }
}

/// First path segment after normalization, empty for root-level files.
pub fn top_level_folder(path: &str) -> String {
    let normalized = normalize_path(path);
    let mut segments = remove_leading_slash(&normalized).split('/');
    match (segments.next(), segments.next()) {
        (Some(first), Some(_)) => first.to_string(),
        _ => String::new(),
    }
}

/// Resource kind conventionally stored under `folder`.
pub fn folder_to_resource_kind(folder: &str) -> Option<ResourceKind> {
    match remove_leading_slash(folder) {
        "sources" => Some(ResourceKind::Source),
        "models" => Some(ResourceKind::Model),
        "dashboards" | "metrics" => Some(ResourceKind::MetricsView),
        "charts" => Some(ResourceKind::Component),
        "custom-dashboards" => Some(ResourceKind::Dashboard),
        "apis" => Some(ResourceKind::Api),
        _ => None,
    }
}

/// Whether `path` is the primary definition file of a resource.
pub fn is_main_entity(path: &str) -> bool {
    let file = path.rsplit('/').next().unwrap_or(path);
    match file.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => MAIN_ENTITY_EXTENSIONS
            .iter()
            .any(|candidate| ext.eq_ignore_ascii_case(candidate)),
        _ => false,
    }
}
