//! Content types for files served by the dev server and for data URLs.

use std::path::Path;

pub mod types {
    pub const HTML: &str = "text/html; charset=utf-8";
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const CSS: &str = "text/css; charset=utf-8";
    pub const JAVASCRIPT: &str = "text/javascript; charset=utf-8";
    pub const JSON: &str = "application/json";
    pub const XML: &str = "application/xml";
    pub const OCTET_STREAM: &str = "application/octet-stream";

    pub const PNG: &str = "image/png";
    pub const JPEG: &str = "image/jpeg";
    pub const GIF: &str = "image/gif";
    pub const WEBP: &str = "image/webp";
    pub const SVG: &str = "image/svg+xml";
    pub const ICO: &str = "image/x-icon";

    pub const WOFF2: &str = "font/woff2";
}

/// Guess the content type from a path's extension.
pub fn from_path(path: &Path) -> &'static str {
    from_extension(path.extension().and_then(|e| e.to_str()))
}

pub fn from_extension(ext: Option<&str>) -> &'static str {
    let ext = ext.map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("html" | "htm") => types::HTML,
        Some("txt" | "md") => types::PLAIN,
        Some("css") => types::CSS,
        Some("js" | "mjs") => types::JAVASCRIPT,
        Some("json") => types::JSON,
        Some("xml") => types::XML,
        Some("png") => types::PNG,
        Some("jpg" | "jpeg") => types::JPEG,
        Some("gif") => types::GIF,
        Some("webp") => types::WEBP,
        Some("svg") => types::SVG,
        Some("ico") => types::ICO,
        Some("woff2") => types::WOFF2,
        _ => types::OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_from_path() {
        assert_eq!(from_path(&PathBuf::from("index.html")), types::HTML);
        assert_eq!(from_path(&PathBuf::from("sitemap.xml")), types::XML);
        assert_eq!(from_path(&PathBuf::from("qr.PNG")), types::PNG);
        assert_eq!(from_path(&PathBuf::from("shot.jpg")), types::JPEG);
        assert_eq!(from_path(&PathBuf::from("icon.svg")), types::SVG);
        assert_eq!(from_path(&PathBuf::from("blob.bin")), types::OCTET_STREAM);
        assert_eq!(from_path(&PathBuf::from("Makefile")), types::OCTET_STREAM);
    }
}
