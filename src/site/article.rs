//! Blog articles: Markdown files with optional front matter.
//!
//! ```text
//! +++
//! title = "Encoding images as Base64"
//! date = 2024-03-01
//! description = "When a data URL beats a separate request."
//! tool = "base64"
//! +++
//!
//! Body in Markdown...
//! ```
//!
//! TOML front matter is fenced with `+++`, YAML with `---`. Every field is
//! optional; the title falls back to the first `# heading`, then the file
//! name.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use jwalk::WalkDir;
use serde::{Deserialize, Deserializer};

use crate::tools::ToolKind;
use crate::tools::markdown_preview::{MarkdownOptions, outline, render_html};
use crate::utils::path::slug::{is_valid_slug, slugify};

/// Words per minute used for the reading time estimate.
const READING_WPM: usize = 200;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    #[serde(deserialize_with = "deserialize_date")]
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub draft: bool,
    /// Slug of the tool this article is about.
    pub tool: Option<String>,
    pub slug: Option<String>,
}

/// Accept a TOML date (`date = 2024-03-01`) as well as a quoted string.
fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Option::<toml::Value>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(toml::Value::String(text)) => text,
        Some(toml::Value::Datetime(dt)) => dt.to_string(),
        Some(other) => {
            return Err(serde::de::Error::custom(format!(
                "invalid date `{other}`, expected YYYY-MM-DD"
            )));
        }
    };
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map(Some)
        .map_err(|_| serde::de::Error::custom(format!("invalid date `{text}`, expected YYYY-MM-DD")))
}

#[derive(Debug, Clone)]
pub struct Article {
    pub source: PathBuf,
    pub slug: String,
    pub title: String,
    pub date: Option<NaiveDate>,
    pub description: String,
    pub draft: bool,
    pub tool: Option<ToolKind>,
    pub body_html: String,
    pub words: usize,
}

impl Article {
    pub fn parse(source: &Path, content: &str) -> Result<Self> {
        let (meta, body) = split_front_matter(content)?;

        let options = MarkdownOptions::gfm();
        let (words, headings) = outline(body, options);

        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let title = meta
            .title
            .filter(|t| !t.trim().is_empty())
            .or_else(|| headings.iter().find(|h| h.level == 1).map(|h| h.text.clone()))
            .unwrap_or_else(|| stem.to_string());

        let slug = match meta.slug {
            Some(slug) if is_valid_slug(&slug) => slug,
            Some(slug) => bail!("invalid slug `{slug}` (use lowercase letters, digits and `-`)"),
            None => Some(slugify(&title))
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| slugify(stem)),
        };
        if slug.is_empty() {
            bail!("cannot derive a slug; set `slug` in the front matter");
        }

        let tool = match meta.tool {
            Some(name) => Some(
                ToolKind::from_slug(&name).ok_or_else(|| anyhow!("unknown tool `{name}`"))?,
            ),
            None => None,
        };

        Ok(Self {
            source: source.to_path_buf(),
            slug,
            title,
            date: meta.date,
            description: meta.description.unwrap_or_default(),
            draft: meta.draft,
            tool,
            body_html: render_html(body, options),
            words,
        })
    }

    pub fn permalink(&self) -> String {
        format!("/blog/{}/", self.slug)
    }

    pub fn reading_minutes(&self) -> usize {
        self.words.div_ceil(READING_WPM).max(1)
    }
}

/// Split `content` into parsed front matter and the Markdown body.
fn split_front_matter(content: &str) -> Result<(FrontMatter, &str)> {
    let trimmed = content.trim_start_matches('\u{feff}').trim_start();

    for (fence, is_toml) in [("+++", true), ("---", false)] {
        let Some(rest) = trimmed.strip_prefix(fence) else {
            continue;
        };
        let Some(end) = rest.find(&format!("\n{fence}")) else {
            bail!("front matter opened with `{fence}` is never closed");
        };
        let raw = rest[..end].trim();
        let body = rest[end + 1 + fence.len()..].trim_start_matches(['\r', '\n']);

        let meta = if raw.is_empty() {
            FrontMatter::default()
        } else if is_toml {
            toml::from_str(raw).context("invalid TOML front matter")?
        } else {
            serde_yaml::from_str(raw).context("invalid YAML front matter")?
        };
        return Ok((meta, body));
    }
    Ok((FrontMatter::default(), content))
}

/// Articles found under the content directory.
#[derive(Debug, Default)]
pub struct Articles {
    /// Newest first; undated articles last, by title.
    pub list: Vec<Article>,
    pub drafts_skipped: usize,
}

/// Load every `*.md` file under `content_dir`. A missing directory yields no
/// articles.
pub fn load_articles(content_dir: &Path, include_drafts: bool) -> Result<Articles> {
    if !content_dir.is_dir() {
        return Ok(Articles::default());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(content_dir)
        .skip_hidden(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("md")))
        .collect();
    files.sort();

    let mut articles = Articles::default();
    let mut seen: HashMap<String, PathBuf> = HashMap::new();

    for path in files {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let article =
            Article::parse(&path, &content).with_context(|| format!("In {}", path.display()))?;

        if article.draft && !include_drafts {
            articles.drafts_skipped += 1;
            continue;
        }
        if let Some(first) = seen.insert(article.slug.clone(), path.clone()) {
            bail!(
                "Duplicate article slug `{}`: {} and {}",
                article.slug,
                first.display(),
                path.display()
            );
        }
        articles.list.push(article);
    }

    articles.list.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| a.title.cmp(&b.title))
    });
    Ok(articles)
}
