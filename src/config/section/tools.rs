//! `[tools.*]` sections: project defaults for tool inputs.
//!
//! Defaults only seed a tool's input when nothing is persisted for it yet;
//! command-line flags still override them.
//!
//! ```toml
//! [tools.qr]
//! size = 512
//! error_correction = "H"
//! foreground = "#1e293b"
//!
//! [tools.svg]
//! scale = 2.0
//! format = "webp"
//!
//! [tools.markdown]
//! sanitize = true
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::tools::markdown_preview::MarkdownInput;
use crate::tools::qr_code::{ErrorCorrection, MAX_MARGIN, MAX_SIZE, QrFormat, QrInput};
use crate::tools::svg_png::{RasterFormat, SvgPngInput};
use crate::tools::{Color, Tool, ToolKind};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub qr: QrDefaults,
    pub svg: SvgDefaults,
    pub markdown: MarkdownDefaults,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QrDefaults {
    pub size: u32,
    pub margin: u32,
    pub error_correction: ErrorCorrection,
    pub foreground: String,
    pub background: String,
    pub format: QrFormat,
}

impl Default for QrDefaults {
    fn default() -> Self {
        let input = QrInput::default();
        Self {
            size: input.size,
            margin: input.margin,
            error_correction: input.error_correction,
            foreground: input.foreground,
            background: input.background,
            format: input.format,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgDefaults {
    pub scale: f32,
    pub format: RasterFormat,
    pub background: Option<String>,
}

impl Default for SvgDefaults {
    fn default() -> Self {
        Self {
            scale: 1.0,
            format: RasterFormat::Png,
            background: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownDefaults {
    pub gfm: bool,
    pub sanitize: bool,
}

impl Default for MarkdownDefaults {
    fn default() -> Self {
        let input = MarkdownInput::default();
        Self {
            gfm: input.gfm,
            sanitize: input.sanitize,
        }
    }
}

impl ToolsConfig {
    const QR_SIZE: FieldPath = FieldPath::new("tools.qr.size");
    const QR_MARGIN: FieldPath = FieldPath::new("tools.qr.margin");
    const QR_FOREGROUND: FieldPath = FieldPath::new("tools.qr.foreground");
    const QR_BACKGROUND: FieldPath = FieldPath::new("tools.qr.background");
    const SVG_SCALE: FieldPath = FieldPath::new("tools.svg.scale");
    const SVG_BACKGROUND: FieldPath = FieldPath::new("tools.svg.background");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !(64..=MAX_SIZE).contains(&self.qr.size) {
            diag.error(
                Self::QR_SIZE,
                format!("QR size {} is outside 64..={MAX_SIZE}", self.qr.size),
            );
        }
        if self.qr.margin > MAX_MARGIN {
            diag.error(
                Self::QR_MARGIN,
                format!("QR margin must be at most {MAX_MARGIN} modules"),
            );
        }
        check_color(diag, Self::QR_FOREGROUND, &self.qr.foreground);
        check_color(diag, Self::QR_BACKGROUND, &self.qr.background);

        if !(self.svg.scale > 0.0 && self.svg.scale <= 16.0) {
            diag.error_with_hint(
                Self::SVG_SCALE,
                format!("SVG scale {} is outside (0, 16]", self.svg.scale),
                "use width/height flags for very large renders",
            );
        }
        if let Some(bg) = &self.svg.background {
            check_color(diag, Self::SVG_BACKGROUND, bg);
        }
    }

    /// Starting input for a tool that has nothing persisted.
    pub fn default_input(&self, kind: ToolKind) -> serde_json::Value {
        let value = match kind {
            ToolKind::Qr => serde_json::to_value(QrInput {
                size: self.qr.size,
                margin: self.qr.margin,
                error_correction: self.qr.error_correction,
                foreground: self.qr.foreground.clone(),
                background: self.qr.background.clone(),
                format: self.qr.format,
                ..QrInput::default()
            }),
            ToolKind::SvgToPng => serde_json::to_value(SvgPngInput {
                scale: self.svg.scale,
                format: self.svg.format,
                background: self.svg.background.clone(),
                ..SvgPngInput::default()
            }),
            ToolKind::Markdown => serde_json::to_value(MarkdownInput {
                gfm: self.markdown.gfm,
                sanitize: self.markdown.sanitize,
                ..MarkdownInput::default()
            }),
            _ => return serde_json::Value::Null,
        };
        value.unwrap_or(serde_json::Value::Null)
    }

    /// Typed version of [`Self::default_input`].
    pub fn defaults_for<T: Tool>(&self) -> T::Input {
        ToolKind::from_slug(T::SLUG)
            .map(|kind| self.default_input(kind))
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default()
    }
}

fn check_color(diag: &mut ConfigDiagnostics, field: FieldPath, value: &str) {
    if let Err(e) = Color::parse(value) {
        diag.error(field, e.to_string());
    }
}
