//! Request target to filesystem path mapping.
//!
//! The target is appended to the served root as-is: no percent-decoding, no
//! normalisation and no rejection of `..` segments.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

/// Appends `target` to `root`, adding `index` when the target ends in `/`.
///
/// # Example
///
/// ```
/// # use docserve::http::resolve::resolve;
/// # use std::path::{Path, PathBuf};
/// assert_eq!(resolve(Path::new("."), "/a.html", "index.html"), PathBuf::from("./a.html"));
/// assert_eq!(resolve(Path::new("."), "/docs/", "index.html"), PathBuf::from("./docs/index.html"));
/// ```
pub fn resolve(root: &Path, target: &str, index: &str) -> PathBuf {
    // String concatenation, not Path::join: an absolute target must not
    // replace the root.
    let mut path = OsString::from(root.as_os_str());
    path.push(target);

    if target.ends_with('/') {
        path.push(index);
    }

    PathBuf::from(path)
}

/// A resolved path together with the size of the file behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub path: PathBuf,
    pub size: u64,
}

impl ResolvedPath {
    /// Looks up `path`. Returns `None` unless it names a regular file.
    pub async fn stat(path: &Path) -> Option<Self> {
        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_file() => Some(Self {
                size: meta.len(),
                path: path.to_path_buf(),
            }),
            Ok(_) => None,
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "stat failed");
                None
            }
        }
    }
}
