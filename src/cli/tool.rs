//! Tool subcommands.
//!
//! Every tool runs the same way:
//!
//! 1. start from the saved input (or config defaults, or `--reset`)
//! 2. overlay the flags given on the command line
//! 3. run the tool; on error report it and leave the saved input alone
//! 4. print the result (or write it with `--output`) and save the input

use std::borrow::Cow;

use anyhow::{Result, anyhow, bail};

use super::args::{
    Base64Args, BoxShadowArgs, CommonArgs, GradientArgs, HtmlEntitiesArgs, JwtArgs, MarkdownArgs,
    MetaTagsArgs, PaletteArgs, QrArgs, SvgToPngArgs, UuidArgs, YamlJsonArgs,
};
use super::common::{print_stdout, write_output};
use crate::config::ToolbenchConfig;
use crate::logger::{status_success, status_warning};
use crate::store::StateStore;
use crate::tools::base64_codec::{Base64Tool, Mode};
use crate::tools::box_shadow::{BoxShadowTool, Shadow};
use crate::tools::gradient::GradientTool;
use crate::tools::html_entities::{EntityMode, HtmlEntitiesTool};
use crate::tools::jwt_decode::JwtTool;
use crate::tools::markdown_preview::MarkdownTool;
use crate::tools::meta_tags::MetaTagsTool;
use crate::tools::palette::PaletteTool;
use crate::tools::qr_code::{QrFormat, QrTool};
use crate::tools::svg_png::SvgPngTool;
use crate::tools::uuid_gen::{self, UuidTool};
use crate::tools::yaml_json::{Direction, YamlJsonTool};
use crate::tools::Tool;
use crate::debug;

type InputOf<C> = <<C as ToolCommand>::Tool as Tool>::Input;
type OutputOf<C> = <<C as ToolCommand>::Tool as Tool>::Output;

/// Binds a subcommand's flags to the tool they drive.
pub trait ToolCommand {
    type Tool: Tool;

    fn common(&self) -> &CommonArgs;

    /// Copy every flag that was given onto `input`.
    fn overlay(&self, input: &mut InputOf<Self>) -> Result<()>;

    /// Human-readable result for stdout.
    fn render(output: &OutputOf<Self>) -> String;

    /// Raw bytes for `--output`, when the result is a file format.
    fn binary(_output: &OutputOf<Self>) -> Option<&[u8]> {
        None
    }

    fn warnings(_output: &OutputOf<Self>) -> &[String] {
        &[]
    }
}

/// Run a tool subcommand against the project's state store.
pub fn run<C: ToolCommand>(args: &C, config: &ToolbenchConfig) -> Result<()> {
    let mut store = StateStore::from_config(&config.store);
    run_with_store(args, config, &mut store)
}

fn run_with_store<C: ToolCommand>(
    args: &C,
    config: &ToolbenchConfig,
    store: &mut StateStore,
) -> Result<()> {
    let common = args.common();
    let key = C::Tool::STORAGE_KEY;

    let saved = if common.reset { None } else { store.load(key) };
    let mut input = saved.unwrap_or_else(|| config.tools.defaults_for::<C::Tool>());
    args.overlay(&mut input)?;

    let output = C::Tool::run(&input)
        .map_err(|e| anyhow!(e).context(format!("{} failed", C::Tool::TITLE)))?;

    for warning in C::warnings(&output) {
        status_warning(warning);
    }

    match &common.output {
        Some(path) => {
            let bytes = match (common.json, C::binary(&output)) {
                (false, Some(bytes)) => Cow::Borrowed(bytes),
                (false, None) => Cow::Owned(C::render(&output).into_bytes()),
                (true, _) => Cow::Owned(serde_json::to_vec_pretty(&output)?),
            };
            write_output(path, &bytes)?;
            status_success(&format!("{}: wrote {}", C::Tool::SLUG, path.display()));
        }
        None if common.json => print_stdout(&serde_json::to_string_pretty(&output)?)?,
        None => print_stdout(&C::render(&output))?,
    }

    if common.no_save {
        debug!("state"; "--no-save, keeping previous {key}");
    } else {
        store.save(key, &input);
    }
    Ok(())
}

/// `uuid --validate`: report the version instead of generating.
pub fn validate_uuid(text: &str) -> Result<()> {
    let version = uuid_gen::validate(text).map_err(|e| anyhow!(e).context("Invalid UUID"))?;
    print_stdout(&format!("valid (version {version})"))
}

fn set<T>(target: &mut T, value: Option<&T>)
where
    T: Clone,
{
    if let Some(value) = value {
        *target = value.clone();
    }
}

impl ToolCommand for Base64Args {
    type Tool = Base64Tool;

    fn common(&self) -> &CommonArgs {
        &self.common
    }

    fn overlay(&self, input: &mut InputOf<Self>) -> Result<()> {
        set(&mut input.text, self.input.read()?.as_ref());
        set(&mut input.mode, self.mode.as_ref());
        if self.decode {
            input.mode = Mode::Decode;
        }
        set(&mut input.url_safe, self.url_safe.as_ref());
        Ok(())
    }

    fn render(output: &OutputOf<Self>) -> String {
        output.output.clone()
    }
}

impl ToolCommand for BoxShadowArgs {
    type Tool = BoxShadowTool;

    fn common(&self) -> &CommonArgs {
        &self.common
    }

    fn overlay(&self, input: &mut InputOf<Self>) -> Result<()> {
        let layers = input.shadows.len();
        if self.remove {
            if self.layer >= layers {
                bail!("No shadow layer {} (there are {layers})", self.layer);
            }
            input.shadows.remove(self.layer);
            return Ok(());
        }

        match self.layer {
            i if i == layers => input.shadows.push(Shadow::default()),
            i if i > layers => bail!("Layer {i} is out of range; the next new layer is {layers}"),
            _ => {}
        }
        let shadow = &mut input.shadows[self.layer];
        set(&mut shadow.h_offset, self.h_offset.as_ref());
        set(&mut shadow.v_offset, self.v_offset.as_ref());
        set(&mut shadow.blur, self.blur.as_ref());
        set(&mut shadow.spread, self.spread.as_ref());
        set(&mut shadow.color, self.shadow_color.as_ref());
        set(&mut shadow.inset, self.inset.as_ref());
        Ok(())
    }

    fn render(output: &OutputOf<Self>) -> String {
        output.css.clone()
    }
}

impl ToolCommand for GradientArgs {
    type Tool = GradientTool;

    fn common(&self) -> &CommonArgs {
        &self.common
    }

    fn overlay(&self, input: &mut InputOf<Self>) -> Result<()> {
        set(&mut input.kind, self.kind.as_ref());
        set(&mut input.angle, self.angle.as_ref());
        set(&mut input.shape, self.shape.as_ref());
        if !self.stops.is_empty() {
            input.stops.clone_from(&self.stops);
        }
        Ok(())
    }

    fn render(output: &OutputOf<Self>) -> String {
        output.css.clone()
    }
}

impl ToolCommand for QrArgs {
    type Tool = QrTool;

    fn common(&self) -> &CommonArgs {
        &self.common
    }

    fn overlay(&self, input: &mut InputOf<Self>) -> Result<()> {
        set(&mut input.content, self.input.read()?.as_ref());
        set(&mut input.size, self.size.as_ref());
        set(&mut input.margin, self.margin.as_ref());
        set(&mut input.error_correction, self.error_correction.as_ref());
        set(&mut input.foreground, self.foreground.as_ref());
        set(&mut input.background, self.background.as_ref());
        set(&mut input.format, self.format.as_ref());
        Ok(())
    }

    /// SVG markup as is; PNG as a data URL.
    fn render(output: &OutputOf<Self>) -> String {
        match output.format {
            QrFormat::Svg => String::from_utf8_lossy(&output.bytes).into_owned(),
            QrFormat::Png => output.data_url.clone(),
        }
    }

    fn binary(output: &OutputOf<Self>) -> Option<&[u8]> {
        Some(&output.bytes)
    }
}

impl ToolCommand for PaletteArgs {
    type Tool = PaletteTool;

    fn common(&self) -> &CommonArgs {
        &self.common
    }

    fn overlay(&self, input: &mut InputOf<Self>) -> Result<()> {
        set(&mut input.base_color, self.base_color.as_ref());
        set(&mut input.method, self.method.as_ref());
        Ok(())
    }

    fn render(output: &OutputOf<Self>) -> String {
        let mut text: String = output
            .colors
            .iter()
            .map(|c| format!("{:<9} {:<20} {}\n", c.hex, c.rgb, c.hsl))
            .collect();
        text.push('\n');
        text.push_str(&output.css_variables);
        text
    }
}

impl ToolCommand for MetaTagsArgs {
    type Tool = MetaTagsTool;

    fn common(&self) -> &CommonArgs {
        &self.common
    }

    fn overlay(&self, input: &mut InputOf<Self>) -> Result<()> {
        set(&mut input.title, self.title.as_ref());
        set(&mut input.description, self.description.as_ref());
        set(&mut input.keywords, self.keywords.as_ref());
        set(&mut input.author, self.author.as_ref());
        set(&mut input.url, self.url.as_ref());
        set(&mut input.image, self.image.as_ref());
        set(&mut input.site_name, self.site_name.as_ref());
        set(&mut input.twitter_card, self.twitter_card.as_ref());
        set(&mut input.twitter_site, self.twitter_site.as_ref());
        set(&mut input.robots_index, self.robots_index.as_ref());
        set(&mut input.robots_follow, self.robots_follow.as_ref());
        set(&mut input.theme_color, self.theme_color.as_ref());
        Ok(())
    }

    fn render(output: &OutputOf<Self>) -> String {
        output.html.clone()
    }

    fn warnings(output: &OutputOf<Self>) -> &[String] {
        &output.warnings
    }
}

impl ToolCommand for JwtArgs {
    type Tool = JwtTool;

    fn common(&self) -> &CommonArgs {
        &self.common
    }

    fn overlay(&self, input: &mut InputOf<Self>) -> Result<()> {
        if let Some(token) = self.input.read()? {
            input.token = token.trim().to_string();
        }
        set(&mut input.secret, self.secret.as_ref());
        Ok(())
    }

    fn render(output: &OutputOf<Self>) -> String {
        let pretty = |v: &serde_json::Value| serde_json::to_string_pretty(v).unwrap_or_default();
        let mut text = format!(
            "Header:\n{}\n\nPayload:\n{}\n\nSignature: {}\n",
            pretty(&output.header),
            pretty(&output.payload),
            output.signature
        );

        let claims = &output.claims;
        for (label, value) in [
            ("Issued at", &claims.issued_at),
            ("Not before", &claims.not_before),
            ("Expires at", &claims.expires_at),
        ] {
            if let Some(value) = value {
                text.push_str(&format!("{label}: {value}\n"));
            }
        }
        if claims.expired == Some(true) {
            text.push_str("Token has expired\n");
        }
        if let Some(verification) = &output.verification {
            let mark = if verification.valid { "✓" } else { "✗" };
            text.push_str(&format!("{mark} {}\n", verification.message));
        }
        text
    }
}

impl ToolCommand for MarkdownArgs {
    type Tool = MarkdownTool;

    fn common(&self) -> &CommonArgs {
        &self.common
    }

    fn overlay(&self, input: &mut InputOf<Self>) -> Result<()> {
        set(&mut input.markdown, self.input.read()?.as_ref());
        set(&mut input.gfm, self.gfm.as_ref());
        set(&mut input.sanitize, self.sanitize.as_ref());
        Ok(())
    }

    fn render(output: &OutputOf<Self>) -> String {
        output.html.clone()
    }
}

impl ToolCommand for HtmlEntitiesArgs {
    type Tool = HtmlEntitiesTool;

    fn common(&self) -> &CommonArgs {
        &self.common
    }

    fn overlay(&self, input: &mut InputOf<Self>) -> Result<()> {
        set(&mut input.text, self.input.read()?.as_ref());
        set(&mut input.mode, self.mode.as_ref());
        if self.decode {
            input.mode = EntityMode::Decode;
        }
        set(&mut input.encode_non_ascii, self.non_ascii.as_ref());
        Ok(())
    }

    fn render(output: &OutputOf<Self>) -> String {
        output.output.clone()
    }
}

impl ToolCommand for SvgToPngArgs {
    type Tool = SvgPngTool;

    fn common(&self) -> &CommonArgs {
        &self.common
    }

    fn overlay(&self, input: &mut InputOf<Self>) -> Result<()> {
        set(&mut input.svg, self.input.read()?.as_ref());
        if let Some(scale) = self.scale {
            input.scale = scale;
            // saved dimensions would override the new scale
            if self.width.is_none() && self.height.is_none() {
                input.width = None;
                input.height = None;
            }
        }
        if self.width.is_some() || self.height.is_some() {
            input.width = self.width;
            input.height = self.height;
        }
        if let Some(bg) = &self.background {
            input.background = (!bg.eq_ignore_ascii_case("none")).then(|| bg.clone());
        }
        set(&mut input.format, self.format.as_ref());
        Ok(())
    }

    fn render(output: &OutputOf<Self>) -> String {
        output.data_url.clone()
    }

    fn binary(output: &OutputOf<Self>) -> Option<&[u8]> {
        Some(&output.bytes)
    }
}

impl ToolCommand for UuidArgs {
    type Tool = UuidTool;

    fn common(&self) -> &CommonArgs {
        &self.common
    }

    fn overlay(&self, input: &mut InputOf<Self>) -> Result<()> {
        set(&mut input.count, self.count.as_ref());
        set(&mut input.version, self.version.as_ref());
        set(&mut input.uppercase, self.uppercase.as_ref());
        set(&mut input.hyphens, self.hyphens.as_ref());
        set(&mut input.braces, self.braces.as_ref());
        Ok(())
    }

    fn render(output: &OutputOf<Self>) -> String {
        output.uuids.join("\n")
    }
}

impl ToolCommand for YamlJsonArgs {
    type Tool = YamlJsonTool;

    fn common(&self) -> &CommonArgs {
        &self.common
    }

    fn overlay(&self, input: &mut InputOf<Self>) -> Result<()> {
        set(&mut input.text, self.input.read()?.as_ref());
        set(&mut input.direction, self.direction.as_ref());
        if self.to_yaml {
            input.direction = Direction::JsonToYaml;
        }
        set(&mut input.indent, self.indent.as_ref());
        Ok(())
    }

    fn render(output: &OutputOf<Self>) -> String {
        output.output.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::tools::base64_codec::Base64Input;
    use crate::tools::box_shadow::BoxShadowInput;
    use crate::tools::svg_png::SvgPngInput;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn command(args: &[&str]) -> Commands {
        Cli::parse_from(std::iter::once("toolbench").chain(args.iter().copied())).command
    }

    fn config_in(dir: &TempDir) -> ToolbenchConfig {
        let mut config = ToolbenchConfig::default();
        config.root = dir.path().to_path_buf();
        config.store.path = dir.path().join("state.json");
        config
    }

    #[test]
    fn test_run_saves_input() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let out = dir.path().join("out.txt");
        let out_arg = out.to_str().unwrap();

        let Commands::Base64(args) = command(&["base64", "??>", "-o", out_arg]) else {
            panic!("expected base64");
        };
        run(&args, &config).unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "Pz8+");

        let saved: Base64Input = StateStore::open(&config.store.path)
            .load("base64Converter")
            .unwrap();
        assert_eq!(saved.text, "??>");

        // saved text is reused, only the alphabet changes
        let Commands::Base64(args) = command(&["base64", "--url-safe", "-o", out_arg]) else {
            panic!("expected base64");
        };
        run(&args, &config).unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "Pz8-");
    }

    #[test]
    fn test_failed_run_keeps_state() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let mut store = StateStore::open(&config.store.path);
        store.try_save("qrGenerator", &serde_json::json!({ "content": "keep me" })).unwrap();

        let Commands::Qr(args) = command(&["qr", "--fg", "not-a-color"]) else {
            panic!("expected qr");
        };
        let err = run_with_store(&args, &config, &mut store).unwrap_err();
        assert_eq!(err.to_string(), "QR Code Generator failed");

        let reopened = StateStore::open(&config.store.path);
        assert_eq!(reopened.get("qrGenerator").unwrap()["content"], "keep me");
        assert!(reopened.get("qrGenerator").unwrap().get("foreground").is_none());
    }

    #[test]
    fn test_no_save_and_reset() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let out = dir.path().join("qr.png");
        let out_arg = out.to_str().unwrap();

        let Commands::Qr(args) = command(&["qr", "first", "-o", out_arg]) else {
            panic!("expected qr");
        };
        run(&args, &config).unwrap();
        assert_eq!(&fs::read(&out).unwrap()[1..4], b"PNG");

        let Commands::Qr(args) = command(&["qr", "second", "--no-save", "-o", out_arg]) else {
            panic!("expected qr");
        };
        run(&args, &config).unwrap();
        let store = StateStore::open(&config.store.path);
        assert_eq!(store.get("qrGenerator").unwrap()["content"], "first");

        // --reset drops the saved content, so the run fails validation
        let Commands::Qr(args) = command(&["qr", "--reset", "-o", out_arg]) else {
            panic!("expected qr");
        };
        assert!(run(&args, &config).is_err());
    }

    #[test]
    fn test_box_shadow_layers() {
        let mut input = BoxShadowInput::default();
        let Commands::BoxShadow(args) = command(&["box-shadow", "-l", "1", "-c", "red", "--inset"]) else {
            panic!("expected box-shadow");
        };
        args.overlay(&mut input).unwrap();
        assert_eq!(input.shadows.len(), 2);
        assert_eq!(input.shadows[1].color, "red");
        assert!(input.shadows[1].inset);

        let Commands::BoxShadow(args) = command(&["box-shadow", "-l", "5"]) else {
            panic!("expected box-shadow");
        };
        assert!(args.overlay(&mut input).is_err());

        let Commands::BoxShadow(args) = command(&["box-shadow", "-l", "0", "--remove"]) else {
            panic!("expected box-shadow");
        };
        args.overlay(&mut input).unwrap();
        assert_eq!(input.shadows.len(), 1);
        assert_eq!(input.shadows[0].color, "red");
    }

    #[test]
    fn test_svg_scale_clears_saved_size() {
        let mut input = SvgPngInput {
            width: Some(100),
            background: Some("#fff".into()),
            ..SvgPngInput::default()
        };
        let Commands::SvgToPng(args) = command(&["svg-to-png", "-s", "3", "-b", "none"]) else {
            panic!("expected svg-to-png");
        };
        args.overlay(&mut input).unwrap();
        assert_eq!(input.scale, 3.0);
        assert_eq!(input.width, None);
        assert_eq!(input.background, None);
    }

    #[test]
    fn test_config_defaults_apply() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir);
        config.tools.qr.format = QrFormat::Svg;
        let out = dir.path().join("qr.svg");

        let Commands::Qr(args) = command(&["qr", "hi", "-o", out.to_str().unwrap()]) else {
            panic!("expected qr");
        };
        run(&args, &config).unwrap();
        assert!(fs::read_to_string(&out).unwrap().contains("<svg"));
    }
}
