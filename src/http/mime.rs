use std::path::Path;

/// Fallback for names matching no entry.
pub const DEFAULT_MIME: &str = "text/plain";

/// Searched in order; the first suffix found anywhere in the name wins.
const MIME_TABLE: &[(&str, &str)] = &[
    (".html", "text/html"),
    (".jpeg", "image/jpeg"),
    (".jpg", "image/jpg"),
    (".pdf", "application/pdf"),
];

/// Picks a Content-Type for `path` by case-sensitive substring match.
pub fn mime_for(path: &Path) -> &'static str {
    let name = path.to_string_lossy();

    MIME_TABLE
        .iter()
        .find(|(suffix, _)| name.contains(suffix))
        .map(|(_, mime)| *mime)
        .unwrap_or(DEFAULT_MIME)
}
