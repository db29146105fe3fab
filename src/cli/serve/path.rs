//! Request URL to file resolution under the output directory.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

/// Path part of a request URL, without query string or fragment.
pub fn url_path(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

/// File served for `url`: the file itself, or `index.html` for a directory.
///
/// `None` when nothing matches or the resolved path would leave `root`
/// (through `..`, encoded separators or symlinks).
pub fn resolve_path(url: &str, root: &Path) -> Option<PathBuf> {
    let decoded = percent_decode_str(url_path(url))
        .decode_utf8()
        .unwrap_or(Cow::Borrowed(""));
    let relative = decoded.trim_matches('/');
    if relative.split(['/', '\\']).any(|part| part == "..") {
        return None;
    }

    let canonical = root.join(relative).canonicalize().ok()?;
    let root = root.canonicalize().ok()?;
    if !canonical.starts_with(&root) {
        return None;
    }

    if canonical.is_file() {
        return Some(canonical);
    }
    let index = canonical.join("index.html");
    index.is_file().then_some(index)
}
