//! SVG rasterizer.
//!
//! Parsing goes through `usvg`, rendering through `resvg` onto a `tiny-skia`
//! pixmap. PNG is encoded straight from the pixmap; JPEG and WebP go through
//! `image` after un-premultiplying alpha.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use resvg::tiny_skia::{self, Pixmap, Transform};
use serde::{Deserialize, Serialize};

use super::{Color, Tool, ToolError, data_url};
use crate::utils::mime::types;

/// Largest accepted output edge in pixels.
pub const MAX_DIMENSION: u32 = 16384;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
}

impl RasterFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
        }
    }

    fn mime(self) -> &'static str {
        match self {
            Self::Png => types::PNG,
            Self::Jpeg => types::JPEG,
            Self::Webp => types::WEBP,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgPngInput {
    pub svg: String,
    pub scale: f32,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub background: Option<String>,
    pub format: RasterFormat,
}

impl Default for SvgPngInput {
    fn default() -> Self {
        Self {
            svg: String::new(),
            scale: 1.0,
            width: None,
            height: None,
            background: None,
            format: RasterFormat::Png,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SvgPngOutput {
    pub data_url: String,
    pub width: u32,
    pub height: u32,
    pub format: RasterFormat,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

pub struct SvgPngTool;

impl Tool for SvgPngTool {
    const SLUG: &'static str = "svg-to-png";
    const STORAGE_KEY: &'static str = "svgToPngConverter";
    const TITLE: &'static str = "SVG to PNG Converter";
    const DESCRIPTION: &'static str = "Rasterize SVG markup to PNG, JPEG or WebP at any scale.";

    type Input = SvgPngInput;
    type Output = SvgPngOutput;

    fn run(input: &SvgPngInput) -> Result<SvgPngOutput, ToolError> {
        if input.svg.trim().is_empty() {
            return Err(ToolError::invalid("Please enter SVG markup"));
        }
        let background = match input.background.as_deref().map(str::trim) {
            Some("") | None => None,
            Some(color) => Some(Color::parse(color)?),
        };

        let tree = usvg::Tree::from_data(input.svg.as_bytes(), &usvg::Options::default())
            .map_err(|e| ToolError::parse("SVG", e))?;
        let intrinsic = tree.size();
        let (width, height) = output_size(
            (intrinsic.width(), intrinsic.height()),
            input.scale,
            input.width,
            input.height,
        )?;

        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| ToolError::invalid(format!("Cannot allocate {width}x{height} image")))?;

        // JPEG has no alpha channel
        let background = match (background, input.format) {
            (None, RasterFormat::Jpeg) => Some(Color::WHITE),
            (bg, _) => bg,
        };
        if let Some(bg) = background {
            let [r, g, b, a] = bg.to_rgba8();
            pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
        }

        #[allow(clippy::cast_precision_loss)]
        let transform = Transform::from_scale(
            width as f32 / intrinsic.width(),
            height as f32 / intrinsic.height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        let bytes = encode(&pixmap, input.format)?;
        Ok(SvgPngOutput {
            data_url: data_url(input.format.mime(), &bytes),
            width,
            height,
            format: input.format,
            bytes,
        })
    }
}

/// Explicit dimensions win; a single one keeps the aspect ratio.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn output_size(
    intrinsic: (f32, f32),
    scale: f32,
    width: Option<u32>,
    height: Option<u32>,
) -> Result<(u32, u32), ToolError> {
    let (iw, ih) = intrinsic;
    let (w, h) = match (width, height) {
        (Some(w), Some(h)) => (w as f32, h as f32),
        (Some(w), None) => (w as f32, w as f32 * ih / iw),
        (None, Some(h)) => (h as f32 * iw / ih, h as f32),
        (None, None) => {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(ToolError::invalid("Scale must be a positive number"));
            }
            (iw * scale, ih * scale)
        }
    };

    let (w, h) = (w.round(), h.round());
    let limit = MAX_DIMENSION as f32;
    if !(w >= 1.0 && h >= 1.0) {
        return Err(ToolError::invalid("Output size must be at least 1x1 pixels"));
    }
    if w > limit || h > limit {
        return Err(ToolError::invalid(format!(
            "Output size {w}x{h} exceeds the {MAX_DIMENSION}px limit"
        )));
    }
    Ok((w as u32, h as u32))
}

fn encode(pixmap: &Pixmap, format: RasterFormat) -> Result<Vec<u8>, ToolError> {
    if format == RasterFormat::Png {
        return pixmap
            .encode_png()
            .map_err(|e| ToolError::Encode(e.to_string()));
    }

    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }

    let (img, image_format) = match format {
        RasterFormat::Jpeg => (
            DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(img).to_rgb8()),
            ImageFormat::Jpeg,
        ),
        _ => (DynamicImage::ImageRgba8(img), ImageFormat::WebP),
    };

    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image_format)
        .map_err(|e| ToolError::Encode(e.to_string()))?;
    Ok(buf)
}
