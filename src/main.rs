//! Toolbench - small developer utilities on the command line, with a static
//! site and a local JSON API for the same tools.

mod cli;
mod config;
mod core;
mod embed;
mod logger;
mod site;
mod store;
mod tools;
mod utils;

use std::process::ExitCode;

use anyhow::Result;
use clap::{ColorChoice, Parser};

use cli::{Cli, Commands, tool};
use config::ToolbenchConfig;
use logger::status_error;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let causes: Vec<String> = e.chain().skip(1).map(|c| format!("  {c}")).collect();
            status_error(&e.to_string(), &causes.join("\n"));
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // before anything blocks
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
    logger::set_verbose(cli.verbose);

    let config = ToolbenchConfig::load(&cli)?;

    match &cli.command {
        Commands::Base64(args) => tool::run(args, &config),
        Commands::BoxShadow(args) => tool::run(args, &config),
        Commands::Gradient(args) => tool::run(args, &config),
        Commands::Qr(args) => tool::run(args, &config),
        Commands::Palette(args) => tool::run(args, &config),
        Commands::MetaTags(args) => tool::run(args, &config),
        Commands::Jwt(args) => tool::run(args, &config),
        Commands::Markdown(args) => tool::run(args, &config),
        Commands::HtmlEntities(args) => tool::run(args, &config),
        Commands::SvgToPng(args) => tool::run(args, &config),
        Commands::Uuid(args) => match &args.validate {
            Some(text) => tool::validate_uuid(text),
            None => tool::run(args, &config),
        },
        Commands::YamlJson(args) => tool::run(args, &config),
        Commands::Build { .. } => cli::build::run(&config),
        Commands::Serve { .. } => cli::serve::run(&config),
        Commands::State { action } => cli::state::run(action, &config),
    }
}
