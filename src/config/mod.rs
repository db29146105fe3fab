//! Project configuration from `toolbench.toml`.
//!
//! The file is optional: without one every section takes its defaults and
//! the working directory becomes the project root.
//!
//! | Section      | Purpose                                     |
//! |--------------|---------------------------------------------|
//! | `[site]`     | Title, description, url, author             |
//! | `[build]`    | Content/output directories, drafts, sitemap |
//! | `[serve]`    | Local server interface and port             |
//! | `[store]`    | Persisted tool inputs                       |
//! | `[tools.*]`  | Input defaults for qr, svg and markdown     |

mod error;
mod section;
mod util;

pub use error::{ConfigDiagnostics, ConfigError, FieldPath};
pub use section::{BuildConfig, ServeConfig, SiteConfig, StoreConfig, ToolsConfig};

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::cli::{BuildArgs, Cli, Commands, DEFAULT_CONFIG};
use crate::utils::path::normalize_path;
use crate::{debug, log};
use util::find_config_file;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolbenchConfig {
    /// Config file in use, if any (internal)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Project root: the config file's directory, else the cwd (internal)
    #[serde(skip)]
    pub root: PathBuf,

    pub site: SiteConfig,
    pub build: BuildConfig,
    pub serve: ServeConfig,
    pub store: StoreConfig,
    pub tools: ToolsConfig,
}

impl ToolbenchConfig {
    /// Locate, parse, finalize and validate the configuration.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config, &cwd) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = Some(normalize_path(&path));
                config
            }
            None if cli.config != Path::new(DEFAULT_CONFIG) => {
                bail!("Config file `{}` not found", cli.config.display());
            }
            None => {
                debug!("config"; "no {} found, using defaults", DEFAULT_CONFIG);
                Self::default()
            }
        };

        let root = config
            .config_path
            .as_deref()
            .and_then(Path::parent)
            .map_or(cwd, Path::to_path_buf);
        config.finalize(&root, cli);
        config.validate()?;
        Ok(config)
    }

    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        if !ignored.is_empty() {
            let name = path
                .file_name()
                .map_or_else(|| path.to_string_lossy(), |n| n.to_string_lossy());
            log!("warning"; "unknown fields in {} are ignored: {}", name, ignored.join(", "));
        }
        Ok(config)
    }

    /// Parse TOML, collecting the paths of unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn finalize(&mut self, root: &Path, cli: &Cli) {
        self.root = normalize_path(root);
        self.apply_command_options(&cli.command);

        self.build.content = self.root.join(&self.build.content);
        self.build.output = self.root.join(&self.build.output);
        self.store.path = self.root.join(&self.store.path);
    }

    fn apply_command_options(&mut self, command: &Commands) {
        match command {
            Commands::Build { build_args } => self.apply_build_args(build_args),
            Commands::Serve {
                build_args,
                interface,
                port,
            } => {
                self.apply_build_args(build_args);
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
            }
            _ => {}
        }
    }

    fn apply_build_args(&mut self, args: &BuildArgs) {
        Self::update_option(&mut self.build.output, args.output.as_ref());
        Self::update_option(&mut self.build.sitemap, args.sitemap.as_ref());
        if args.drafts {
            self.build.drafts = true;
        }
    }

    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Check every section, reporting all problems together.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();
        self.site.validate(&mut diag);
        self.serve.validate(&mut diag);
        self.tools.validate(&mut diag);
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Path shown to the user, relative to the project root when possible.
    pub fn root_relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}

/// Parse a config snippet, failing on unknown fields so typos surface.
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> ToolbenchConfig {
    let (parsed, ignored) = ToolbenchConfig::parse_with_ignored(extra).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {ignored:?}"
    );
    parsed
}
