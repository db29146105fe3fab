//! Static site generation.
//!
//! Pipeline: load articles -> plan pages -> render + write (parallel) ->
//! assets -> sitemap.

pub mod article;
pub mod page;
pub mod sitemap;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rayon::prelude::*;

use crate::config::ToolbenchConfig;
use crate::core::is_shutdown;
use crate::embed::site::{STYLE_CSS, TOOL_JS};
use crate::logger::ProgressLine;
use crate::tools::ToolKind;
use crate::utils::path::write_file;
use crate::utils::plural_count;
use crate::{debug, log};

use article::load_articles;
use page::{PageContext, PageKind, RenderedPage};
use sitemap::Sitemap;

/// Static files written next to the pages, by path under the output dir.
const ASSETS: [(&str, &str); 2] = [
    ("assets/style.css", STYLE_CSS),
    ("assets/tool.js", TOOL_JS),
];

#[derive(Debug, Default)]
pub struct BuildSummary {
    pub output: PathBuf,
    pub tools: usize,
    pub articles: usize,
    pub drafts_skipped: usize,
    /// Number of sitemap entries, `None` when disabled.
    pub sitemap: Option<usize>,
}

/// Build the whole site into `config.build.output`.
pub fn build_site(config: &ToolbenchConfig, quiet: bool) -> Result<BuildSummary> {
    let output = &config.build.output;
    let articles = load_articles(&config.build.content, config.build.drafts)?;
    debug!(
        "build";
        "{} from {}",
        plural_count(articles.list.len(), "article"),
        config.root_relative(&config.build.content).display()
    );
    if !quiet && articles.drafts_skipped > 0 {
        log!("build"; "{} skipped", plural_count(articles.drafts_skipped, "draft"));
    }

    let mut pages = vec![PageKind::Home, PageKind::BlogIndex, PageKind::NotFound];
    pages.extend(ToolKind::ALL.iter().copied().map(PageKind::Tool));
    pages.extend(articles.list.iter().map(PageKind::Article));

    let progress = (!quiet).then(|| {
        ProgressLine::new(&[
            ("tools", ToolKind::ALL.len()),
            ("articles", articles.list.len()),
            ("pages", 3),
        ])
    });

    let ctx = PageContext::new(config, &articles.list);
    let rendered = pages
        .par_iter()
        .map(|page| -> Result<RenderedPage> {
            if is_shutdown() {
                bail!("build interrupted");
            }
            let rendered = ctx.render(page);
            write_page(output, &rendered)?;
            if let Some(progress) = &progress {
                progress.inc(page.counter());
            }
            Ok(rendered)
        })
        .collect::<Result<Vec<RenderedPage>>>()?;

    if let Some(progress) = progress {
        progress.finish();
    }

    for (path, content) in ASSETS {
        let path = output.join(path);
        write_file(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    let sitemap = if config.build.sitemap {
        let sitemap = Sitemap::from_pages(&rendered, config.site.base_url());
        if config.site.base_url().is_none() {
            debug!("build"; "no [site] url set, sitemap uses relative locations");
        }
        let count = sitemap.len();
        sitemap.write(output)?;
        Some(count)
    } else {
        None
    };

    Ok(BuildSummary {
        output: output.clone(),
        tools: ToolKind::ALL.len(),
        articles: articles.list.len(),
        drafts_skipped: articles.drafts_skipped,
        sitemap,
    })
}

fn write_page(output: &Path, page: &RenderedPage) -> Result<()> {
    let path = output.join(&page.path);
    write_file(&path, &page.html).with_context(|| format!("Failed to write {}", path.display()))
}
