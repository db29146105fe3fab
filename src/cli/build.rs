//! `toolbench build`: render the site into the output directory.

use anyhow::Result;

use crate::config::ToolbenchConfig;
use crate::log;
use crate::site::{BuildSummary, build_site};
use crate::utils::plural_count;

pub fn run(config: &ToolbenchConfig) -> Result<()> {
    let summary = build_site(config, false)?;
    log_summary(config, &summary);
    Ok(())
}

pub fn log_summary(config: &ToolbenchConfig, summary: &BuildSummary) {
    let mut parts = vec![
        plural_count(summary.tools, "tool"),
        plural_count(summary.articles, "article"),
    ];
    if let Some(urls) = summary.sitemap {
        parts.push(format!("sitemap ({})", plural_count(urls, "url")));
    }
    log!(
        "done";
        "{} -> {}",
        parts.join(", "),
        config.root_relative(&summary.output).display()
    );
}
