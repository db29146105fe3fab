//! HTML meta tag generator (SEO, Open Graph, Twitter cards).

use serde::{Deserialize, Serialize};

use super::{Color, Tool, ToolError};
use crate::utils::html::{escape, escape_attr};

const TITLE_SOFT_LIMIT: usize = 60;
const DESCRIPTION_SOFT_LIMIT: usize = 160;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TwitterCard {
    #[default]
    Summary,
    SummaryLargeImage,
}

impl TwitterCard {
    fn as_str(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::SummaryLargeImage => "summary_large_image",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MetaTagsInput {
    pub title: String,
    pub description: String,
    /// Comma separated.
    pub keywords: String,
    pub author: String,
    pub url: String,
    pub image: String,
    pub site_name: String,
    pub twitter_card: TwitterCard,
    /// Twitter handle, with or without the leading `@`.
    pub twitter_site: String,
    pub robots_index: bool,
    pub robots_follow: bool,
    pub theme_color: String,
}

impl Default for MetaTagsInput {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            keywords: String::new(),
            author: String::new(),
            url: String::new(),
            image: String::new(),
            site_name: String::new(),
            twitter_card: TwitterCard::Summary,
            twitter_site: String::new(),
            robots_index: true,
            robots_follow: true,
            theme_color: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetaTagsOutput {
    pub html: String,
    pub warnings: Vec<String>,
}

pub struct MetaTagsTool;

impl Tool for MetaTagsTool {
    const SLUG: &'static str = "meta-tags";
    const STORAGE_KEY: &'static str = "metaTagGenerator";
    const TITLE: &'static str = "Meta Tag Generator";
    const DESCRIPTION: &'static str = "Write SEO, Open Graph and Twitter card tags for a page.";

    type Input = MetaTagsInput;
    type Output = MetaTagsOutput;

    fn run(input: &MetaTagsInput) -> Result<MetaTagsOutput, ToolError> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(ToolError::invalid("Title is required"));
        }
        let url = checked_url("URL", &input.url)?;
        let image = checked_url("Image URL", &input.image)?;

        let mut warnings = Vec::new();
        let description = input.description.trim();
        if title.chars().count() > TITLE_SOFT_LIMIT {
            warnings.push(format!(
                "Title is longer than {TITLE_SOFT_LIMIT} characters and may be truncated in search results"
            ));
        }
        if description.chars().count() > DESCRIPTION_SOFT_LIMIT {
            warnings.push(format!(
                "Description is longer than {DESCRIPTION_SOFT_LIMIT} characters and may be truncated in search results"
            ));
        }
        let theme_color = input.theme_color.trim();
        if !theme_color.is_empty() && Color::parse(theme_color).is_err() {
            warnings.push(format!("Theme color `{theme_color}` is not a valid CSS color"));
        }

        let keywords = input
            .keywords
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        let robots = format!(
            "{}, {}",
            if input.robots_index { "index" } else { "noindex" },
            if input.robots_follow { "follow" } else { "nofollow" }
        );
        let twitter_site = match input.twitter_site.trim() {
            "" => String::new(),
            handle if handle.starts_with('@') => handle.to_string(),
            handle => format!("@{handle}"),
        };

        let mut tags = TagWriter::default();
        tags.raw(format!("<title>{}</title>", escape(title)));
        tags.name("description", description);
        tags.name("keywords", &keywords);
        tags.name("author", input.author.trim());
        tags.name("robots", &robots);
        tags.name("theme-color", theme_color);

        tags.property("og:type", "website");
        tags.property("og:title", title);
        tags.property("og:description", description);
        tags.property("og:url", url);
        tags.property("og:image", image);
        tags.property("og:site_name", input.site_name.trim());

        tags.name("twitter:card", input.twitter_card.as_str());
        tags.name("twitter:title", title);
        tags.name("twitter:description", description);
        tags.name("twitter:image", image);
        tags.name("twitter:site", &twitter_site);

        Ok(MetaTagsOutput {
            html: tags.finish(),
            warnings,
        })
    }
}

/// Returns the trimmed value, or an error if it is set but not an http(s) URL.
fn checked_url<'a>(label: &str, value: &'a str) -> Result<&'a str, ToolError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(value);
    }
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(value),
        _ => Err(ToolError::invalid(format!(
            "{label} must be an absolute http(s) URL"
        ))),
    }
}

/// Collects tag lines, skipping tags whose content is empty.
#[derive(Default)]
struct TagWriter {
    lines: Vec<String>,
}

impl TagWriter {
    fn raw(&mut self, line: String) {
        self.lines.push(line);
    }

    fn name(&mut self, name: &str, content: &str) {
        self.attr("name", name, content);
    }

    fn property(&mut self, property: &str, content: &str) {
        self.attr("property", property, content);
    }

    fn attr(&mut self, attr: &str, key: &str, content: &str) {
        if content.is_empty() {
            return;
        }
        self.lines.push(format!(
            r#"<meta {attr}="{key}" content="{}">"#,
            escape_attr(content)
        ));
    }

    fn finish(self) -> String {
        self.lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str) -> MetaTagsInput {
        MetaTagsInput {
            title: title.to_string(),
            ..MetaTagsInput::default()
        }
    }

    #[test]
    fn test_minimal() {
        let out = MetaTagsTool::run(&input("My Page")).unwrap();
        assert_eq!(
            out.html,
            [
                "<title>My Page</title>",
                r#"<meta name="robots" content="index, follow">"#,
                r#"<meta property="og:type" content="website">"#,
                r#"<meta property="og:title" content="My Page">"#,
                r#"<meta name="twitter:card" content="summary">"#,
                r#"<meta name="twitter:title" content="My Page">"#,
            ]
            .join("\n")
        );
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_full() {
        let out = MetaTagsTool::run(&MetaTagsInput {
            title: "Tools & Tips".into(),
            description: "Say \"hi\"".into(),
            keywords: "rust, cli,, tools ".into(),
            url: "https://example.com/page".into(),
            image: "https://example.com/og.png".into(),
            twitter_card: TwitterCard::SummaryLargeImage,
            twitter_site: "example".into(),
            robots_index: false,
            theme_color: "#3b82f6".into(),
            ..MetaTagsInput::default()
        })
        .unwrap();

        assert!(out.html.contains("<title>Tools &amp; Tips</title>"));
        assert!(out.html.contains(r#"<meta name="description" content="Say &quot;hi&quot;">"#));
        assert!(out.html.contains(r#"<meta name="keywords" content="rust, cli, tools">"#));
        assert!(out.html.contains(r#"<meta name="robots" content="noindex, follow">"#));
        assert!(out.html.contains(r#"<meta property="og:url" content="https://example.com/page">"#));
        assert!(out.html.contains(r#"<meta name="twitter:card" content="summary_large_image">"#));
        assert!(out.html.contains(r#"<meta name="twitter:site" content="@example">"#));
        assert!(out.html.contains(r##"<meta name="theme-color" content="#3b82f6">"##));
    }

    #[test]
    fn test_title_required() {
        assert_eq!(
            MetaTagsTool::run(&input("   ")).unwrap_err().to_string(),
            "Title is required"
        );
    }

    #[test]
    fn test_bad_url() {
        let err = MetaTagsTool::run(&MetaTagsInput {
            url: "example.com".into(),
            ..input("x")
        })
        .unwrap_err();
        assert!(err.to_string().starts_with("URL must be"));

        assert!(MetaTagsTool::run(&MetaTagsInput {
            image: "ftp://example.com/a.png".into(),
            ..input("x")
        })
        .is_err());
    }

    #[test]
    fn test_warnings() {
        let out = MetaTagsTool::run(&MetaTagsInput {
            title: "t".repeat(61),
            description: "d".repeat(161),
            theme_color: "blurple".into(),
            ..MetaTagsInput::default()
        })
        .unwrap();
        assert_eq!(out.warnings.len(), 3);
    }
}
