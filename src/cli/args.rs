//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{ColorChoice, Parser, Subcommand};
use serde::de::DeserializeOwned;

pub const DEFAULT_CONFIG: &str = "toolbench.toml";

/// Small developer utilities on the command line, plus a static site and a
/// local JSON API exposing the same tools
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path, searched upward from the working directory
    #[arg(short = 'C', long, global = true, default_value = DEFAULT_CONFIG, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Print debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Encode text to Base64 or decode it back
    Base64(Base64Args),

    /// Build a CSS box-shadow from one or more layers
    BoxShadow(BoxShadowArgs),

    /// Build a linear, radial or conic CSS gradient
    Gradient(GradientArgs),

    /// Render text as a QR code (PNG or SVG)
    Qr(QrArgs),

    /// Derive a color palette from a base color
    Palette(PaletteArgs),

    /// Generate SEO, Open Graph and Twitter meta tags
    MetaTags(MetaTagsArgs),

    /// Decode a JWT and optionally verify its signature
    Jwt(JwtArgs),

    /// Render Markdown to HTML
    #[command(visible_alias = "md")]
    Markdown(MarkdownArgs),

    /// Encode or decode HTML entities
    HtmlEntities(HtmlEntitiesArgs),

    /// Rasterize SVG markup to PNG, JPEG or WebP
    SvgToPng(SvgToPngArgs),

    /// Generate UUIDs
    Uuid(UuidArgs),

    /// Convert between YAML and JSON
    YamlJson(YamlJsonArgs),

    /// Build the static site
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Build the site and serve it together with the tool API
    #[command(visible_alias = "s")]
    Serve {
        #[command(flatten)]
        build_args: BuildArgs,

        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Inspect or clear saved tool inputs
    State {
        #[command(subcommand)]
        action: StateAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum StateAction {
    /// List saved entries
    #[command(visible_alias = "ls")]
    List,

    /// Print one saved entry as JSON
    Show {
        /// Storage key or tool slug (e.g. `qrGenerator` or `qr`)
        key: String,
    },

    /// Remove one entry, or everything when no key is given
    Clear {
        /// Storage key or tool slug
        key: Option<String>,
    },
}

/// Shared build arguments for Build and Serve commands
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Output directory (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Enable sitemap generation
    #[arg(short = 'S', long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub sitemap: Option<bool>,

    /// Include draft articles
    #[arg(short = 'D', long)]
    pub drafts: bool,
}

/// Flags shared by every tool subcommand.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,

    /// Write binary results (images) to this file
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Don't persist the input of this run
    #[arg(long)]
    pub no_save: bool,

    /// Start from defaults instead of the saved input
    #[arg(long)]
    pub reset: bool,
}

/// Text given inline, via `--file`, or on stdin (`-`).
#[derive(clap::Args, Debug, Clone, Default)]
pub struct TextArgs {
    /// Input text; `-` reads stdin
    #[arg(value_name = "TEXT", conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the input from a file; `-` reads stdin
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub file: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct Base64Args {
    #[command(flatten)]
    pub input: TextArgs,

    /// encode or decode
    #[arg(short, long, value_parser = serde_value::<crate::tools::base64_codec::Mode>)]
    pub mode: Option<crate::tools::base64_codec::Mode>,

    /// Shorthand for `--mode decode`
    #[arg(short, long, conflicts_with = "mode")]
    pub decode: bool,

    /// Use the URL-safe alphabet without padding
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub url_safe: Option<bool>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(clap::Args, Debug, Clone)]
pub struct BoxShadowArgs {
    /// Layer to edit; one past the last layer appends a new one
    #[arg(short, long, default_value_t = 0)]
    pub layer: usize,

    /// Remove the selected layer instead of editing it
    #[arg(long, conflicts_with_all = ["h_offset", "v_offset", "blur", "spread", "shadow_color", "inset"])]
    pub remove: bool,

    /// Horizontal offset in px
    #[arg(short = 'x', long, allow_negative_numbers = true)]
    pub h_offset: Option<i32>,

    /// Vertical offset in px
    #[arg(short = 'y', long, allow_negative_numbers = true)]
    pub v_offset: Option<i32>,

    /// Blur radius in px
    #[arg(short, long)]
    pub blur: Option<u32>,

    /// Spread radius in px
    #[arg(short, long, allow_negative_numbers = true)]
    pub spread: Option<i32>,

    /// Shadow color (hex, rgb(), rgba() or a named color)
    #[arg(id = "shadow_color", short = 'c', long = "shadow-color")]
    pub shadow_color: Option<String>,

    /// Draw the shadow inside the box
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub inset: Option<bool>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(clap::Args, Debug, Clone)]
pub struct GradientArgs {
    /// linear, radial or conic
    #[arg(short, long, value_parser = serde_value::<crate::tools::gradient::GradientKind>)]
    pub kind: Option<crate::tools::gradient::GradientKind>,

    /// Angle in degrees (linear and conic)
    #[arg(short, long, allow_negative_numbers = true)]
    pub angle: Option<i32>,

    /// circle or ellipse (radial)
    #[arg(long, value_parser = serde_value::<crate::tools::gradient::RadialShape>)]
    pub shape: Option<crate::tools::gradient::RadialShape>,

    /// Color stop as `COLOR@PERCENT`, repeatable; replaces all saved stops
    #[arg(short = 's', long = "stop", value_name = "COLOR@PERCENT", value_parser = parse_stop)]
    pub stops: Vec<crate::tools::gradient::ColorStop>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(clap::Args, Debug, Clone)]
pub struct QrArgs {
    #[command(flatten)]
    pub input: TextArgs,

    /// Image size in pixels
    #[arg(short, long)]
    pub size: Option<u32>,

    /// Quiet zone in modules
    #[arg(short, long)]
    pub margin: Option<u32>,

    /// Error correction level: L, M, Q or H
    #[arg(short = 'e', long = "ecc", value_parser = serde_value::<crate::tools::qr_code::ErrorCorrection>)]
    pub error_correction: Option<crate::tools::qr_code::ErrorCorrection>,

    /// Module color
    #[arg(long = "fg")]
    pub foreground: Option<String>,

    /// Background color
    #[arg(long = "bg")]
    pub background: Option<String>,

    /// png or svg
    #[arg(long, value_parser = serde_value::<crate::tools::qr_code::QrFormat>)]
    pub format: Option<crate::tools::qr_code::QrFormat>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(clap::Args, Debug, Clone)]
pub struct PaletteArgs {
    /// Base color
    #[arg(value_name = "COLOR")]
    pub base_color: Option<String>,

    /// Harmony rule, e.g. complementary, triadic, split-complementary
    #[arg(short, long, value_parser = serde_value::<crate::tools::palette::Harmony>)]
    pub method: Option<crate::tools::palette::Harmony>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(clap::Args, Debug, Clone)]
pub struct MetaTagsArgs {
    #[arg(short, long)]
    pub title: Option<String>,

    #[arg(short, long)]
    pub description: Option<String>,

    /// Comma separated
    #[arg(short, long)]
    pub keywords: Option<String>,

    #[arg(short, long)]
    pub author: Option<String>,

    /// Canonical page URL
    #[arg(short, long)]
    pub url: Option<String>,

    /// Preview image URL
    #[arg(short, long)]
    pub image: Option<String>,

    #[arg(long)]
    pub site_name: Option<String>,

    /// summary or summary_large_image
    #[arg(long, value_parser = serde_value::<crate::tools::meta_tags::TwitterCard>)]
    pub twitter_card: Option<crate::tools::meta_tags::TwitterCard>,

    /// Twitter handle of the site
    #[arg(long)]
    pub twitter_site: Option<String>,

    /// Allow indexing (robots)
    #[arg(long = "index", action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub robots_index: Option<bool>,

    /// Allow following links (robots)
    #[arg(long = "follow", action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub robots_follow: Option<bool>,

    #[arg(long)]
    pub theme_color: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(clap::Args, Debug, Clone)]
pub struct JwtArgs {
    #[command(flatten)]
    pub input: TextArgs,

    /// HMAC secret or PEM public key used to verify the signature
    #[arg(short, long)]
    pub secret: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(clap::Args, Debug, Clone)]
pub struct MarkdownArgs {
    #[command(flatten)]
    pub input: TextArgs,

    /// GitHub flavoured extensions (tables, task lists, strikethrough, footnotes)
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub gfm: Option<bool>,

    /// Escape raw HTML instead of passing it through
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub sanitize: Option<bool>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(clap::Args, Debug, Clone)]
pub struct HtmlEntitiesArgs {
    #[command(flatten)]
    pub input: TextArgs,

    /// encode or decode
    #[arg(short, long, value_parser = serde_value::<crate::tools::html_entities::EntityMode>)]
    pub mode: Option<crate::tools::html_entities::EntityMode>,

    /// Shorthand for `--mode decode`
    #[arg(short, long, conflicts_with = "mode")]
    pub decode: bool,

    /// Also encode every non-ASCII character
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub non_ascii: Option<bool>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SvgToPngArgs {
    #[command(flatten)]
    pub input: TextArgs,

    /// Scale factor applied to the intrinsic size
    #[arg(short, long)]
    pub scale: Option<f32>,

    /// Output width in pixels
    #[arg(short = 'W', long)]
    pub width: Option<u32>,

    /// Output height in pixels
    #[arg(short = 'H', long)]
    pub height: Option<u32>,

    /// Background color; `none` keeps transparency
    #[arg(short, long)]
    pub background: Option<String>,

    /// png, jpeg or webp
    #[arg(long, value_parser = serde_value::<crate::tools::svg_png::RasterFormat>)]
    pub format: Option<crate::tools::svg_png::RasterFormat>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(clap::Args, Debug, Clone)]
pub struct UuidArgs {
    /// How many to generate
    #[arg(short = 'n', long)]
    pub count: Option<u32>,

    /// v4 (random) or v7 (time-ordered)
    #[arg(short = 't', long = "type", value_parser = serde_value::<crate::tools::uuid_gen::UuidVersion>)]
    pub version: Option<crate::tools::uuid_gen::UuidVersion>,

    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub uppercase: Option<bool>,

    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub hyphens: Option<bool>,

    /// Wrap in `{}`
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub braces: Option<bool>,

    /// Check the given UUID instead of generating
    #[arg(long, value_name = "UUID")]
    pub validate: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(clap::Args, Debug, Clone)]
pub struct YamlJsonArgs {
    #[command(flatten)]
    pub input: TextArgs,

    /// yaml-to-json or json-to-yaml
    #[arg(short, long, value_parser = serde_value::<crate::tools::yaml_json::Direction>)]
    pub direction: Option<crate::tools::yaml_json::Direction>,

    /// Shorthand for `--direction json-to-yaml`
    #[arg(long, conflicts_with = "direction")]
    pub to_yaml: bool,

    /// JSON indent width (0 for compact)
    #[arg(long)]
    pub indent: Option<usize>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Parse a flag value through the type's serde names, so the CLI accepts
/// exactly the spellings the JSON API does.
fn serde_value<T: DeserializeOwned>(s: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|_| format!("unsupported value `{s}`"))
}

fn parse_stop(s: &str) -> Result<crate::tools::gradient::ColorStop, String> {
    let (color, position) = s
        .rsplit_once('@')
        .ok_or_else(|| format!("expected COLOR@PERCENT, got `{s}`"))?;
    let position = position
        .trim_end_matches('%')
        .parse::<i32>()
        .ok()
        .filter(|p| (0..=100).contains(p))
        .ok_or_else(|| format!("invalid position in `{s}`, expected 0 to 100"))?;
    Ok(crate::tools::gradient::ColorStop {
        color: color.to_string(),
        position,
    })
}
