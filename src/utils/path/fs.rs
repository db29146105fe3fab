//! Filesystem path helpers.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Absolute form of `path`.
///
/// `canonicalize()` when the path exists; otherwise joined onto the current
/// directory so paths that are about to be created still come out absolute.
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Write `contents`, creating missing parent directories.
pub fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

/// Like `write_file`, but through a sibling temp file and a rename so readers
/// never observe a partial file.
pub fn write_atomic(path: &Path, contents: impl AsRef<[u8]>) -> io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    write_file(&tmp, contents)?;
    fs::rename(&tmp, path)
}
