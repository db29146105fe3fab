//! `[site]` section: metadata used by the generated pages.
//!
//! ```toml
//! [site]
//! title = "Toolbench"
//! description = "Small tools for everyday web work"
//! url = "https://tools.example.com"   # needed for absolute sitemap URLs
//! author = "Jane Doe"
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub description: String,
    pub url: Option<String>,
    pub author: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Toolbench".into(),
            description: "Free developer tools that run on your machine.".into(),
            url: None,
            author: None,
        }
    }
}

impl SiteConfig {
    const URL: FieldPath = FieldPath::new("site.url");
    const TITLE: FieldPath = FieldPath::new("site.title");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.title.trim().is_empty() {
            diag.error(Self::TITLE, "site title must not be empty");
        }

        let Some(url) = &self.url else { return };
        match url::Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            Ok(parsed) => diag.error(
                Self::URL,
                format!("unsupported URL scheme `{}`", parsed.scheme()),
            ),
            Err(e) => diag.error_with_hint(
                Self::URL,
                format!("invalid URL `{url}`: {e}"),
                "use a full URL such as \"https://tools.example.com\"",
            ),
        }
    }

    /// Site URL without trailing slash.
    pub fn base_url(&self) -> Option<&str> {
        self.url.as_deref().map(|u| u.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_site_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.site.title, "Toolbench");
        assert!(config.site.url.is_none());
        assert!(config.site.base_url().is_none());
    }

    #[test]
    fn test_site_url() {
        let config = test_parse_config("[site]\nurl = \"https://tools.example.com/\"");
        assert_eq!(config.site.base_url(), Some("https://tools.example.com"));

        let mut diag = ConfigDiagnostics::new();
        config.site.validate(&mut diag);
        assert!(diag.errors().is_empty());
    }

    #[test]
    fn test_site_url_invalid() {
        for url in ["tools.example.com", "ftp://example.com"] {
            let config = test_parse_config(&format!("[site]\nurl = \"{url}\""));
            let mut diag = ConfigDiagnostics::new();
            config.site.validate(&mut diag);
            assert_eq!(diag.errors().len(), 1, "{url}");
            assert_eq!(diag.errors()[0].field.as_str(), "site.url");
        }
    }
}
