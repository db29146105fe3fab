//! Page rendering.
//!
//! | Page       | Permalink         | File                     |
//! |------------|-------------------|--------------------------|
//! | home       | `/`               | `index.html`             |
//! | tool       | `/tools/<slug>/`  | `tools/<slug>/index.html`|
//! | blog index | `/blog/`          | `blog/index.html`        |
//! | article    | `/blog/<slug>/`   | `blog/<slug>/index.html` |
//! | not found  | (none)            | `404.html`               |

use std::fmt::Write as _;
use std::path::PathBuf;

use chrono::NaiveDate;

use super::article::Article;
use crate::config::ToolbenchConfig;
use crate::embed::Template;
use crate::embed::site::{LAYOUT_HTML, LayoutVars};
use crate::tools::meta_tags::{MetaTagsInput, MetaTagsTool};
use crate::tools::{Tool, ToolKind};
use crate::utils::html::{escape, escape_attr};

/// Articles shown on the home page.
const LATEST_ARTICLES: usize = 5;

#[derive(Debug, Clone, Copy)]
pub enum PageKind<'a> {
    Home,
    Tool(ToolKind),
    BlogIndex,
    Article(&'a Article),
    NotFound,
}

impl PageKind<'_> {
    /// `None` for pages that are not linked (the 404 page).
    pub fn permalink(&self) -> Option<String> {
        match self {
            Self::Home => Some("/".to_string()),
            Self::Tool(kind) => Some(format!("/tools/{}/", kind.slug())),
            Self::BlogIndex => Some("/blog/".to_string()),
            Self::Article(article) => Some(article.permalink()),
            Self::NotFound => None,
        }
    }

    /// Output file, relative to the output directory.
    pub fn output_path(&self) -> PathBuf {
        match self.permalink() {
            Some(link) => PathBuf::from(link.trim_matches('/')).join("index.html"),
            None => PathBuf::from("404.html"),
        }
    }

    /// Progress counter this page is reported under.
    pub fn counter(&self) -> &'static str {
        match self {
            Self::Tool(_) => "tools",
            Self::Article(_) => "articles",
            _ => "pages",
        }
    }
}

#[derive(Debug)]
pub struct RenderedPage {
    pub path: PathBuf,
    pub permalink: Option<String>,
    pub lastmod: Option<NaiveDate>,
    pub html: String,
}

/// Everything pages are rendered from.
pub struct PageContext<'a> {
    config: &'a ToolbenchConfig,
    articles: &'a [Article],
}

impl<'a> PageContext<'a> {
    pub fn new(config: &'a ToolbenchConfig, articles: &'a [Article]) -> Self {
        Self { config, articles }
    }

    pub fn render(&self, page: &PageKind<'_>) -> RenderedPage {
        let site = &self.config.site;
        let (title, description, main) = match page {
            PageKind::Home => (site.title.clone(), site.description.clone(), self.home()),
            PageKind::Tool(kind) => {
                let info = kind.info();
                (info.title.to_string(), info.description.to_string(), self.tool(*kind))
            }
            PageKind::BlogIndex => (
                "Blog".to_string(),
                format!("Articles from {}", site.title),
                self.blog_index(),
            ),
            PageKind::Article(article) => (
                article.title.clone(),
                article.description.clone(),
                self.article(article),
            ),
            PageKind::NotFound => (
                "Page not found".to_string(),
                String::new(),
                "<h1>Page not found</h1>\n<p><a href=\"/\">Back to the tools</a></p>".to_string(),
            ),
        };

        let permalink = page.permalink();
        let head = self.head(&title, &description, permalink.as_deref());
        let footer = self.footer();
        let layout: Template<LayoutVars<'_>> = LAYOUT_HTML;
        let html = layout.render(&LayoutVars {
            head: &head,
            site_title: &escape(&site.title),
            main: &main,
            footer: &footer,
        });

        RenderedPage {
            path: page.output_path(),
            lastmod: match page {
                PageKind::Article(article) => article.date,
                _ => None,
            },
            permalink,
            html,
        }
    }

    /// `<title>` plus SEO/Open Graph/Twitter tags.
    fn head(&self, title: &str, description: &str, permalink: Option<&str>) -> String {
        let site = &self.config.site;
        let full_title = if title == site.title {
            title.to_string()
        } else {
            format!("{title} | {}", site.title)
        };
        let url = match (site.base_url(), permalink) {
            (Some(base), Some(link)) => format!("{base}{link}"),
            _ => String::new(),
        };

        let input = MetaTagsInput {
            title: full_title.clone(),
            description: description.to_string(),
            author: site.author.clone().unwrap_or_default(),
            url,
            site_name: site.title.clone(),
            robots_index: permalink.is_some(),
            ..MetaTagsInput::default()
        };
        // config validation already rejects bad site URLs
        MetaTagsTool::run(&input).map_or_else(
            |_| format!("<title>{}</title>", escape(&full_title)),
            |out| out.html,
        )
    }

    fn footer(&self) -> String {
        let site = &self.config.site;
        match &site.author {
            Some(author) => format!("{} · {}", escape(&site.title), escape(author)),
            None => escape(&site.title).into_owned(),
        }
    }

    fn home(&self) -> String {
        let site = &self.config.site;
        let mut html = format!("<h1>{}</h1>\n", escape(&site.title));
        if !site.description.is_empty() {
            let _ = writeln!(html, "<p>{}</p>", escape(&site.description));
        }

        html.push_str("<h2 id=\"tools\">Tools</h2>\n<ul class=\"grid\">\n");
        for kind in ToolKind::ALL {
            let info = kind.info();
            let _ = writeln!(
                html,
                "<li class=\"card\"><a href=\"/tools/{}/\"><h3>{}</h3></a><p>{}</p></li>",
                info.slug,
                escape(info.title),
                escape(info.description)
            );
        }
        html.push_str("</ul>\n");

        if !self.articles.is_empty() {
            html.push_str("<h2>Latest articles</h2>\n");
            html.push_str(&article_list(
                self.articles.iter().take(LATEST_ARTICLES),
            ));
            html.push_str("<p><a href=\"/blog/\">All articles</a></p>\n");
        }
        html
    }

    fn tool(&self, kind: ToolKind) -> String {
        let info = kind.info();
        let defaults = match self.config.tools.default_input(kind) {
            serde_json::Value::Null => kind.default_input(),
            value => value,
        };
        let defaults = serde_json::to_string_pretty(&defaults).unwrap_or_default();

        let mut html = format!(
            "<h1>{}</h1>\n<p>{}</p>\n",
            escape(info.title),
            escape(info.description)
        );
        let _ = write!(
            html,
            r#"<form id="tool-form" data-slug="{slug}" data-storage-key="{key}">
<label for="tool-input">Input (JSON)</label>
<textarea id="tool-input" name="input" spellcheck="false">{defaults}</textarea>
<p><button type="submit">Run</button> <button type="button" class="secondary" id="tool-reset">Reset</button></p>
</form>
<pre id="tool-output" class="tool-output"></pre>
<h2>Command line</h2>
<pre>toolbench {slug} --help</pre>
"#,
            slug = info.slug,
            key = escape_attr(info.storage_key),
            defaults = escape(&defaults),
        );

        let related: Vec<&Article> = self
            .articles
            .iter()
            .filter(|a| a.tool == Some(kind))
            .collect();
        if !related.is_empty() {
            html.push_str("<h2>Related articles</h2>\n");
            html.push_str(&article_list(related.into_iter()));
        }

        html.push_str("<script src=\"/assets/tool.js\"></script>\n");
        html
    }

    fn blog_index(&self) -> String {
        let mut html = String::from("<h1>Blog</h1>\n");
        if self.articles.is_empty() {
            html.push_str("<p>No articles yet.</p>\n");
        } else {
            html.push_str(&article_list(self.articles.iter()));
        }
        html
    }

    fn article(&self, article: &Article) -> String {
        let mut html = format!("<article>\n<h1>{}</h1>\n", escape(&article.title));
        let mut meta = Vec::new();
        if let Some(date) = article.date {
            meta.push(format_date(date));
        }
        meta.push(format!("{} min read", article.reading_minutes()));
        let _ = writeln!(html, "<p class=\"meta\">{}</p>", meta.join(" · "));

        html.push_str(&article.body_html);

        if let Some(kind) = article.tool {
            let info = kind.info();
            let _ = writeln!(
                html,
                "<p class=\"card\">Try it: <a href=\"/tools/{}/\">{}</a></p>",
                info.slug,
                escape(info.title)
            );
        }
        html.push_str("</article>\n");
        html
    }
}

fn article_list<'a>(articles: impl Iterator<Item = &'a Article>) -> String {
    let mut html = String::from("<ul>\n");
    for article in articles {
        let _ = write!(
            html,
            "<li><a href=\"{}\">{}</a>",
            article.permalink(),
            escape(&article.title)
        );
        if let Some(date) = article.date {
            let _ = write!(html, " <span class=\"meta\">{}</span>", format_date(date));
        }
        if !article.description.is_empty() {
            let _ = write!(html, "<br>{}", escape(&article.description));
        }
        html.push_str("</li>\n");
    }
    html.push_str("</ul>\n");
    html
}

fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use std::path::Path;

    fn article(content: &str) -> Article {
        Article::parse(Path::new("post.md"), content).unwrap()
    }

    #[test]
    fn test_output_paths() {
        assert_eq!(PageKind::Home.output_path(), PathBuf::from("index.html"));
        assert_eq!(
            PageKind::Tool(ToolKind::BoxShadow).output_path(),
            PathBuf::from("tools/box-shadow/index.html")
        );
        assert_eq!(PageKind::BlogIndex.output_path(), PathBuf::from("blog/index.html"));
        assert_eq!(PageKind::NotFound.output_path(), PathBuf::from("404.html"));
        assert_eq!(PageKind::NotFound.permalink(), None);
    }

    #[test]
    fn test_home_lists_tools_and_articles() {
        let config = test_parse_config("[site]\ntitle = \"Bench & Co\"");
        let articles = [article("+++\ntitle = \"First\"\n+++\n")];
        let ctx = PageContext::new(&config, &articles);

        let page = ctx.render(&PageKind::Home);
        assert!(page.html.contains("<title>Bench &amp; Co</title>"));
        for kind in ToolKind::ALL {
            assert!(page.html.contains(&format!("/tools/{}/", kind.slug())));
        }
        assert!(page.html.contains("<a href=\"/blog/first/\">First</a>"));
    }

    #[test]
    fn test_tool_page() {
        let config = test_parse_config("[site]\nurl = \"https://tools.example.com/\"\n[tools.qr]\nsize = 512");
        let articles = [
            article("+++\ntitle = \"QR tips\"\ntool = \"qr\"\n+++\n"),
            article("+++\ntitle = \"Other\"\ntool = \"jwt\"\n+++\n"),
        ];
        let ctx = PageContext::new(&config, &articles);

        let page = ctx.render(&PageKind::Tool(ToolKind::Qr));
        assert!(page.html.contains("data-storage-key=\"qrGenerator\""));
        assert!(page.html.contains("&quot;size&quot;: 512"));
        assert!(page.html.contains("QR tips"));
        assert!(!page.html.contains("Other"));
        assert!(page.html.contains(
            "<meta property=\"og:url\" content=\"https://tools.example.com/tools/qr/\">"
        ));
    }

    #[test]
    fn test_article_page() {
        let config = test_parse_config("");
        let post = article(
            "+++\ntitle = \"Hello <World>\"\ndate = 2024-02-03\ntool = \"uuid\"\n+++\nSome *text*\n",
        );
        let ctx = PageContext::new(&config, std::slice::from_ref(&post));

        let page = ctx.render(&PageKind::Article(&post));
        assert_eq!(page.path, PathBuf::from("blog/hello-world/index.html"));
        assert_eq!(page.lastmod, NaiveDate::from_ymd_opt(2024, 2, 3));
        assert!(page.html.contains("<h1>Hello &lt;World&gt;</h1>"));
        assert!(page.html.contains("February 3, 2024 · 1 min read"));
        assert!(page.html.contains("<em>text</em>"));
        assert!(page.html.contains("href=\"/tools/uuid/\""));
    }

    #[test]
    fn test_not_found_is_noindex() {
        let config = test_parse_config("");
        let ctx = PageContext::new(&config, &[]);
        let page = ctx.render(&PageKind::NotFound);
        assert!(page.html.contains("noindex"));
        assert!(page.permalink.is_none());
    }
}
