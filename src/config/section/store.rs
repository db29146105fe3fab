//! `[store]` section: where the last input of each tool is remembered.
//!
//! ```toml
//! [store]
//! enable = true
//! path = ".toolbench/state.json"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub enable: bool,
    /// Relative to the project root.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            enable: true,
            path: ".toolbench/state.json".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::config::test_parse_config;

    #[test]
    fn test_store_config() {
        let config = test_parse_config("");
        assert!(config.store.enable);
        assert_eq!(config.store.path, Path::new(".toolbench/state.json"));

        let config = test_parse_config("[store]\nenable = false\npath = \"state.json\"");
        assert!(!config.store.enable);
        assert_eq!(config.store.path, Path::new("state.json"));
    }
}
