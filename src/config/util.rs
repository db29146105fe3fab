//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find the config file by walking up from `start`.
///
/// ```text
/// /home/user/site/content/posts/  ← start
/// /home/user/site/toolbench.toml  ← found
/// ```
pub fn find_config_file(config_name: &Path, start: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.is_file().then(|| config_name.to_path_buf());
    }

    start
        .ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_file_walks_up() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("content/posts");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("toolbench.toml"), "").unwrap();

        let found = find_config_file(Path::new("toolbench.toml"), &nested).unwrap();
        assert_eq!(found, dir.path().join("toolbench.toml"));
    }

    #[test]
    fn test_find_config_file_missing() {
        let dir = TempDir::new().unwrap();
        assert!(find_config_file(Path::new("definitely-missing-toolbench.toml"), dir.path()).is_none());
    }

    #[test]
    fn test_find_config_file_absolute() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        assert!(find_config_file(&path, Path::new("/")).is_none());

        fs::write(&path, "").unwrap();
        assert_eq!(find_config_file(&path, Path::new("/")), Some(path));
    }
}
