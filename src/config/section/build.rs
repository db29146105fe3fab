//! `[build]` section.
//!
//! ```toml
//! [build]
//! content = "content"   # markdown articles
//! output = "public"
//! drafts = false
//! sitemap = true
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub content: PathBuf,
    pub output: PathBuf,
    /// Render articles marked `draft = true`.
    pub drafts: bool,
    pub sitemap: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content: "content".into(),
            output: "public".into(),
            drafts: false,
            sitemap: true,
        }
    }
}
