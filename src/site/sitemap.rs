//! `sitemap.xml` for the generated pages.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://tools.example.com/blog/hello/</loc>
//!     <lastmod>2024-03-01</lastmod>
//!   </url>
//! </urlset>
//! ```

use std::path::Path;

use anyhow::{Context, Result};

use super::page::RenderedPage;
use crate::utils::html::escape_xml;
use crate::utils::path::write_file;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

pub const SITEMAP_FILE: &str = "sitemap.xml";

pub struct Sitemap {
    urls: Vec<UrlEntry>,
}

struct UrlEntry {
    loc: String,
    lastmod: Option<String>,
}

impl Sitemap {
    /// Pages without a permalink (the 404 page) are left out. Without a base
    /// URL the locations stay root-relative.
    pub fn from_pages(pages: &[RenderedPage], base_url: Option<&str>) -> Self {
        let base_url = base_url.unwrap_or_default();
        let mut urls: Vec<UrlEntry> = pages
            .iter()
            .filter_map(|page| {
                let permalink = page.permalink.as_deref()?;
                Some(UrlEntry {
                    loc: format!("{base_url}{permalink}"),
                    lastmod: page.lastmod.map(|d| d.format("%Y-%m-%d").to_string()),
                })
            })
            .collect();
        urls.sort_by(|a, b| a.loc.cmp(&b.loc));
        Self { urls }
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    fn into_xml(self) -> String {
        let mut xml = String::with_capacity(4096);

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<urlset xmlns=\"");
        xml.push_str(SITEMAP_NS);
        xml.push_str("\">\n");

        for entry in self.urls {
            xml.push_str("  <url>\n    <loc>");
            xml.push_str(&escape_xml(&entry.loc));
            xml.push_str("</loc>\n");
            if let Some(lastmod) = entry.lastmod {
                xml.push_str("    <lastmod>");
                xml.push_str(&lastmod);
                xml.push_str("</lastmod>\n");
            }
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }

    pub fn write(self, output_dir: &Path) -> Result<()> {
        let path = output_dir.join(SITEMAP_FILE);
        write_file(&path, self.into_xml().as_bytes())
            .with_context(|| format!("Failed to write sitemap to {}", path.display()))
    }
}
