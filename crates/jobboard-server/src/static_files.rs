// crates/jobboard-server/src/static_files.rs
// ============================================================================
// Module: Static File Fallback
// Description: Serves files from the configured asset directory.
// Purpose: Handle paths no route matches, with traversal protection.
// Dependencies: axum, tokio
// ============================================================================

//! ## Overview
//! Unmatched request paths fall through to this module, which maps them onto
//! files under the configured static directory. Request paths are untrusted:
//! only plain path components are accepted, so `..`, absolute segments, and
//! drive prefixes never escape the root. An empty path serves `index.html`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// File served when the request path is the directory root.
const INDEX_FILE: &str = "index.html";

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Resolves a request path to a file under `root`.
///
/// Returns `None` when the path contains anything other than normal
/// components, so traversal outside the root is unrepresentable.
#[must_use]
pub fn resolve_asset_path(root: &Path, request_path: &str) -> Option<PathBuf> {
    let trimmed = request_path.trim_start_matches('/');
    if trimmed.is_empty() {
        return Some(root.join(INDEX_FILE));
    }
    let candidate = Path::new(trimmed);
    for component in candidate.components() {
        match component {
            Component::Normal(_) => {}
            _ => return None,
        }
    }
    Some(root.join(candidate))
}

/// Returns the content type for a file path based on its extension.
#[must_use]
pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions are permitted."
    )]

    use std::path::Path;
    use std::path::PathBuf;

    use super::content_type_for;
    use super::resolve_asset_path;

    #[test]
    fn root_path_serves_the_index_file() {
        let resolved = resolve_asset_path(Path::new("public"), "/").unwrap();
        assert_eq!(resolved, PathBuf::from("public/index.html"));
    }

    #[test]
    fn nested_paths_stay_under_the_root() {
        let resolved = resolve_asset_path(Path::new("public"), "/css/site.css").unwrap();
        assert_eq!(resolved, PathBuf::from("public/css/site.css"));
    }

    #[test]
    fn traversal_components_are_rejected() {
        assert!(resolve_asset_path(Path::new("public"), "/../secret").is_none());
        assert!(resolve_asset_path(Path::new("public"), "/a/../../b").is_none());
    }

    #[test]
    fn content_types_follow_extensions() {
        assert_eq!(content_type_for(Path::new("a.html")), "text/html; charset=utf-8");
        assert_eq!(content_type_for(Path::new("a.css")), "text/css");
        assert_eq!(content_type_for(Path::new("a.bin")), "application/octet-stream");
    }
}
