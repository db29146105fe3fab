//! Markdown previewer.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};
use serde::{Deserialize, Serialize};

use super::{Tool, ToolError};

/// Options for markdown conversion
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownOptions {
    /// Enable tables extension
    pub tables: bool,
    /// Enable footnotes extension
    pub footnotes: bool,
    /// Enable strikethrough extension
    pub strikethrough: bool,
    /// Enable task lists extension
    pub task_lists: bool,
    /// Render raw HTML as escaped text
    pub sanitize: bool,
}

impl MarkdownOptions {
    /// GitHub-flavored: every extension on, raw HTML passed through.
    pub fn gfm() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            task_lists: true,
            sanitize: false,
        }
    }

    fn to_pulldown_options(self) -> Options {
        let mut opts = Options::empty();
        if self.tables {
            opts.insert(Options::ENABLE_TABLES);
        }
        if self.footnotes {
            opts.insert(Options::ENABLE_FOOTNOTES);
        }
        if self.strikethrough {
            opts.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.task_lists {
            opts.insert(Options::ENABLE_TASKLISTS);
        }
        opts
    }
}

/// Render markdown to an HTML fragment.
pub fn render_html(markdown: &str, options: MarkdownOptions) -> String {
    let parser = Parser::new_ext(markdown, options.to_pulldown_options());
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    if options.sanitize {
        html::push_html(&mut out, parser.map(escape_raw_html));
    } else {
        html::push_html(&mut out, parser);
    }
    out
}

fn escape_raw_html(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownInput {
    pub markdown: String,
    pub gfm: bool,
    pub sanitize: bool,
}

impl Default for MarkdownInput {
    fn default() -> Self {
        Self {
            markdown: String::new(),
            gfm: true,
            sanitize: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkdownOutput {
    pub html: String,
    pub words: usize,
    pub headings: Vec<Heading>,
}

pub struct MarkdownTool;

impl Tool for MarkdownTool {
    const SLUG: &'static str = "markdown";
    const STORAGE_KEY: &'static str = "markdownPreviewer";
    const TITLE: &'static str = "Markdown Previewer";
    const DESCRIPTION: &'static str = "Render Markdown to HTML with GitHub-flavored extensions.";

    type Input = MarkdownInput;
    type Output = MarkdownOutput;

    fn run(input: &MarkdownInput) -> Result<MarkdownOutput, ToolError> {
        let mut options = if input.gfm {
            MarkdownOptions::gfm()
        } else {
            MarkdownOptions::default()
        };
        options.sanitize = input.sanitize;

        let (words, headings) = outline(&input.markdown, options);
        Ok(MarkdownOutput {
            html: render_html(&input.markdown, options),
            words,
            headings,
        })
    }
}

/// Count words of visible text and collect headings.
///
/// Text is counted per block, so inline markup inside a word (`foo*bar*`)
/// does not split it.
pub fn outline(markdown: &str, options: MarkdownOptions) -> (usize, Vec<Heading>) {
    let mut words = 0;
    let mut block = String::new();
    let mut headings = Vec::new();
    let mut current: Option<Heading> = None;

    for event in Parser::new_ext(markdown, options.to_pulldown_options()) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                words += take_words(&mut block);
                current = Some(Heading {
                    level: heading_level(level),
                    text: String::new(),
                });
            }
            Event::End(TagEnd::Heading(_)) => {
                words += take_words(&mut block);
                if let Some(mut heading) = current.take() {
                    heading.text = heading.text.trim().to_string();
                    headings.push(heading);
                }
            }
            Event::Start(tag) if !is_inline(&tag) => words += take_words(&mut block),
            Event::End(tag) if !is_inline_end(tag) => words += take_words(&mut block),
            Event::Text(text) | Event::Code(text) => {
                block.push_str(&text);
                if let Some(heading) = current.as_mut() {
                    heading.text.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                block.push(' ');
                if let Some(heading) = current.as_mut() {
                    heading.text.push(' ');
                }
            }
            _ => {}
        }
    }
    words += take_words(&mut block);

    (words, headings)
}

fn take_words(block: &mut String) -> usize {
    let count = block.split_whitespace().count();
    block.clear();
    count
}

fn is_inline(tag: &Tag<'_>) -> bool {
    matches!(
        tag,
        Tag::Emphasis
            | Tag::Strong
            | Tag::Strikethrough
            | Tag::Superscript
            | Tag::Subscript
            | Tag::Link { .. }
            | Tag::Image { .. }
    )
}

fn is_inline_end(tag: TagEnd) -> bool {
    matches!(
        tag,
        TagEnd::Emphasis
            | TagEnd::Strong
            | TagEnd::Strikethrough
            | TagEnd::Superscript
            | TagEnd::Subscript
            | TagEnd::Link
            | TagEnd::Image
    )
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
