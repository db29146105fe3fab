//! QR code generator.
//!
//! Encoding is delegated to `qrcode`; rasterization (PNG via `image`) and the
//! SVG document are produced here from the module grid.

use std::fmt::Write as _;
use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use qrcode::{EcLevel, QrCode, Version};
use serde::{Deserialize, Serialize};

use super::{Color, Tool, ToolError, data_url};
use crate::utils::mime::types;

/// Largest requested image side in pixels.
pub const MAX_SIZE: u32 = 4096;
/// Widest quiet zone in modules.
pub const MAX_MARGIN: u32 = 32;

/// Redundancy tier: roughly 7%, 15%, 25% and 30% recoverable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCorrection {
    L,
    #[default]
    M,
    Q,
    H,
}

impl From<ErrorCorrection> for EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::L => Self::L,
            ErrorCorrection::M => Self::M,
            ErrorCorrection::Q => Self::Q,
            ErrorCorrection::H => Self::H,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QrFormat {
    #[default]
    Png,
    Svg,
}

impl QrFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }

    fn mime(self) -> &'static str {
        match self {
            Self::Png => types::PNG,
            Self::Svg => types::SVG,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QrInput {
    pub content: String,
    pub error_correction: ErrorCorrection,
    /// Requested image size in pixels (rounded down to whole modules).
    pub size: u32,
    /// Quiet zone in modules.
    pub margin: u32,
    pub foreground: String,
    pub background: String,
    pub format: QrFormat,
}

impl Default for QrInput {
    fn default() -> Self {
        Self {
            content: String::new(),
            error_correction: ErrorCorrection::M,
            size: 256,
            margin: 4,
            foreground: "#000000".to_string(),
            background: "#ffffff".to_string(),
            format: QrFormat::Png,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrOutput {
    pub data_url: String,
    pub format: QrFormat,
    /// Side length of the rendered image in pixels.
    pub pixels: u32,
    /// Side length of the symbol in modules (without quiet zone).
    pub modules: u32,
    pub version: i16,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

pub struct QrTool;

impl Tool for QrTool {
    const SLUG: &'static str = "qr";
    const STORAGE_KEY: &'static str = "qrGenerator";
    const TITLE: &'static str = "QR Code Generator";
    const DESCRIPTION: &'static str = "Turn text or links into a QR code as PNG or SVG.";

    type Input = QrInput;
    type Output = QrOutput;

    fn run(input: &QrInput) -> Result<QrOutput, ToolError> {
        if input.content.is_empty() {
            return Err(ToolError::invalid("Please enter content"));
        }
        if !(1..=MAX_SIZE).contains(&input.size) {
            return Err(ToolError::invalid(format!(
                "Size must be between 1 and {MAX_SIZE} pixels"
            )));
        }
        if input.margin > MAX_MARGIN {
            return Err(ToolError::invalid(format!(
                "Margin must be at most {MAX_MARGIN} modules"
            )));
        }
        let foreground = Color::parse(&input.foreground)?;
        let background = Color::parse(&input.background)?;

        let code = QrCode::with_error_correction_level(
            input.content.as_bytes(),
            input.error_correction.into(),
        )
        .map_err(|e| ToolError::Encode(format!("Error generating QR code: {e}")))?;

        let grid = ModuleGrid::new(&code, input.margin);
        let module_px = (input.size / grid.total).max(1);
        let pixels = module_px * grid.total;

        let bytes = match input.format {
            QrFormat::Png => grid.to_png(module_px, foreground, background)?,
            QrFormat::Svg => grid.to_svg(pixels, foreground, background).into_bytes(),
        };

        Ok(QrOutput {
            data_url: data_url(input.format.mime(), &bytes),
            format: input.format,
            pixels,
            modules: grid.modules,
            version: match code.version() {
                Version::Normal(v) | Version::Micro(v) => v,
            },
            bytes,
        })
    }
}

/// Dark/light modules with the quiet zone applied.
struct ModuleGrid {
    dark: Vec<bool>,
    modules: u32,
    margin: u32,
    total: u32,
}

impl ModuleGrid {
    #[allow(clippy::cast_possible_truncation)]
    fn new(code: &QrCode, margin: u32) -> Self {
        let modules = code.width() as u32;
        let dark = code
            .to_colors()
            .into_iter()
            .map(|c| c == qrcode::Color::Dark)
            .collect();
        Self {
            dark,
            modules,
            margin,
            total: modules + 2 * margin,
        }
    }

    fn is_dark(&self, x: u32, y: u32) -> bool {
        self.dark[(y * self.modules + x) as usize]
    }

    fn to_png(&self, module_px: u32, fg: Color, bg: Color) -> Result<Vec<u8>, ToolError> {
        let side = module_px * self.total;
        let mut img = RgbaImage::from_pixel(side, side, Rgba(bg.to_rgba8()));
        let fg = Rgba(fg.to_rgba8());

        for y in 0..self.modules {
            for x in 0..self.modules {
                if !self.is_dark(x, y) {
                    continue;
                }
                let px = (x + self.margin) * module_px;
                let py = (y + self.margin) * module_px;
                for dy in 0..module_px {
                    for dx in 0..module_px {
                        img.put_pixel(px + dx, py + dy, fg);
                    }
                }
            }
        }

        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(|e| ToolError::Encode(format!("Error generating QR code: {e}")))?;
        Ok(buf)
    }

    fn to_svg(&self, pixels: u32, fg: Color, bg: Color) -> String {
        let mut path = String::new();
        for y in 0..self.modules {
            for x in 0..self.modules {
                if self.is_dark(x, y) {
                    let _ = write!(path, "M{},{}h1v1h-1z", x + self.margin, y + self.margin);
                }
            }
        }

        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{px}" height="{px}" "#,
                r#"viewBox="0 0 {total} {total}" shape-rendering="crispEdges">"#,
                r#"<rect width="{total}" height="{total}" fill="{bg}"/>"#,
                r#"<path d="{path}" fill="{fg}"/></svg>"#
            ),
            px = pixels,
            total = self.total,
            bg = bg.to_hex(),
            fg = fg.to_hex(),
            path = path,
        )
    }
}
