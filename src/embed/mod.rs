//! Resources compiled into the binary.
//!
//! - `template` - typed placeholder templates
//! - `site` - page layout, stylesheet and the tool page script
//!
//! ```ignore
//! use embed::site::{LAYOUT_HTML, LayoutVars};
//! let html = LAYOUT_HTML.render(&LayoutVars { head, site_title, main, footer });
//! ```

mod template;

pub use template::{Template, TemplateVars, substitute};

pub mod site {
    use super::{Template, TemplateVars, substitute};

    pub struct LayoutVars<'a> {
        /// `<title>` and meta tags.
        pub head: &'a str,
        pub site_title: &'a str,
        pub main: &'a str,
        pub footer: &'a str,
    }

    impl TemplateVars for LayoutVars<'_> {
        fn apply(&self, content: &str) -> String {
            substitute(
                content,
                &[
                    ("HEAD", self.head),
                    ("SITE_TITLE", self.site_title),
                    ("MAIN", self.main),
                    ("FOOTER", self.footer),
                ],
            )
        }
    }

    pub const LAYOUT_HTML: Template<LayoutVars<'static>> =
        Template::new(include_str!("site/layout.html"));

    /// Served at `/assets/style.css`.
    pub const STYLE_CSS: &str = include_str!("site/style.css");

    /// Served at `/assets/tool.js`; drives the form on tool pages.
    pub const TOOL_JS: &str = include_str!("site/tool.js");
}
