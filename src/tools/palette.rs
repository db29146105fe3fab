//! Color palette generator based on color-wheel harmonies.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::{Color, Tool, ToolError};

/// A named rule for picking related hues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Harmony {
    #[default]
    Complementary,
    Analogous,
    Triadic,
    Tetradic,
    SplitComplementary,
    DoubleSplitComplementary,
    Rectangle,
    Monochromatic,
}

impl Harmony {
    pub const ALL: [Self; 8] = [
        Self::Complementary,
        Self::Analogous,
        Self::Triadic,
        Self::Tetradic,
        Self::SplitComplementary,
        Self::DoubleSplitComplementary,
        Self::Rectangle,
        Self::Monochromatic,
    ];

    /// Hue offsets in degrees; empty for lightness-based harmonies.
    fn hue_offsets(self) -> &'static [f64] {
        match self {
            Self::Complementary => &[0.0, 180.0],
            Self::Analogous => &[-30.0, 0.0, 30.0],
            Self::Triadic => &[0.0, 120.0, 240.0],
            Self::Tetradic => &[0.0, 90.0, 180.0, 270.0],
            Self::SplitComplementary => &[0.0, 150.0, 210.0],
            Self::DoubleSplitComplementary => &[-30.0, 0.0, 30.0, 150.0, 210.0],
            Self::Rectangle => &[0.0, 60.0, 180.0, 240.0],
            Self::Monochromatic => &[],
        }
    }

    pub fn apply(self, base: Color) -> Vec<Color> {
        match self {
            Self::Monochromatic => {
                let l = base.to_hsl().l;
                [-30.0, -15.0, 0.0, 15.0, 30.0]
                    .iter()
                    .map(|step| base.with_lightness(l + step))
                    .collect()
            }
            _ => self
                .hue_offsets()
                .iter()
                .map(|&offset| base.rotate(offset))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaletteInput {
    pub base_color: String,
    pub method: Harmony,
}

impl Default for PaletteInput {
    fn default() -> Self {
        Self {
            base_color: "#3b82f6".to_string(),
            method: Harmony::Complementary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaletteColor {
    pub hex: String,
    pub rgb: String,
    pub hsl: String,
}

impl From<Color> for PaletteColor {
    fn from(color: Color) -> Self {
        Self {
            hex: color.to_hex(),
            rgb: color.to_rgb_string(),
            hsl: color.to_hsl_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteOutput {
    pub colors: Vec<PaletteColor>,
    pub css_variables: String,
}

pub struct PaletteTool;

impl Tool for PaletteTool {
    const SLUG: &'static str = "palette";
    const STORAGE_KEY: &'static str = "colorPaletteGenerator";
    const TITLE: &'static str = "Color Palette Generator";
    const DESCRIPTION: &'static str = "Generate harmonious palettes from a base color.";

    type Input = PaletteInput;
    type Output = PaletteOutput;

    fn run(input: &PaletteInput) -> Result<PaletteOutput, ToolError> {
        let base = Color::parse(&input.base_color)?;
        let colors: Vec<PaletteColor> = input
            .method
            .apply(base)
            .into_iter()
            .map(PaletteColor::from)
            .collect();

        let mut css_variables = String::from(":root {\n");
        for (i, color) in colors.iter().enumerate() {
            let _ = writeln!(css_variables, "  --color-{}: {};", i + 1, color.hex);
        }
        css_variables.push('}');

        Ok(PaletteOutput {
            colors,
            css_variables,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hexes(base: &str, method: Harmony) -> Vec<String> {
        PaletteTool::run(&PaletteInput {
            base_color: base.to_string(),
            method,
        })
        .unwrap()
        .colors
        .into_iter()
        .map(|c| c.hex)
        .collect()
    }

    #[test]
    fn test_complementary() {
        assert_eq!(hexes("#ff0000", Harmony::Complementary), ["#ff0000", "#00ffff"]);
    }

    #[test]
    fn test_triadic() {
        assert_eq!(
            hexes("#ff0000", Harmony::Triadic),
            ["#ff0000", "#00ff00", "#0000ff"]
        );
    }

    fn hues(base: &str, method: Harmony) -> Vec<f64> {
        let base = Color::parse(base).unwrap();
        method
            .apply(base)
            .iter()
            .map(|c| c.to_hsl().h.round())
            .collect()
    }

    #[test]
    fn test_tetradic() {
        assert_eq!(hues("#ff0000", Harmony::Tetradic), [0.0, 90.0, 180.0, 270.0]);
    }

    #[test]
    fn test_analogous_wraps_hue() {
        assert_eq!(hues("#ff0000", Harmony::Analogous), [330.0, 0.0, 30.0]);
    }

    #[test]
    fn test_color_counts() {
        let expected = [2, 3, 3, 4, 3, 5, 4, 5];
        for (method, count) in Harmony::ALL.into_iter().zip(expected) {
            assert_eq!(hexes("#3b82f6", method).len(), count, "{method:?}");
        }
    }

    #[test]
    fn test_monochromatic_keeps_hue() {
        let base = Color::parse("#3b82f6").unwrap();
        let out = Harmony::Monochromatic.apply(base);
        assert_eq!(out[2].to_hex(), "#3b82f6");
        for color in &out {
            let hue = color.to_hsl().h;
            assert!((hue - 217.0).abs() < 3.0, "hue drifted to {hue}");
        }
        let lightness: Vec<f64> = out.iter().map(|c| c.to_hsl().l).collect();
        assert!(lightness.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_css_variables() {
        let out = PaletteTool::run(&PaletteInput {
            base_color: "red".into(),
            method: Harmony::Complementary,
        })
        .unwrap();
        assert_eq!(
            out.css_variables,
            ":root {\n  --color-1: #ff0000;\n  --color-2: #00ffff;\n}"
        );
        assert_eq!(out.colors[0].rgb, "rgb(255, 0, 0)");
        assert_eq!(out.colors[0].hsl, "hsl(0, 100%, 50%)");
    }

    #[test]
    fn test_invalid_base() {
        assert!(PaletteTool::run(&PaletteInput {
            base_color: "#12".into(),
            method: Harmony::Triadic,
        })
        .is_err());
    }

    #[test]
    fn test_method_serde() {
        let input: PaletteInput =
            serde_json::from_str(r##"{"baseColor":"#000","method":"split-complementary"}"##).unwrap();
        assert_eq!(input.method, Harmony::SplitComplementary);
    }
}
