//! CSS color values.
//!
//! A small parser/formatter covering the notations the generators accept:
//! hex (3, 4, 6, 8 digits), `rgb()`/`rgba()`, `hsl()`/`hsla()` and a table of
//! common named colors. Hue math (rotation, lightness steps) happens in HSL.

use super::ToolError;

/// An sRGB color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Alpha in `0.0..=1.0`.
    pub a: f32,
}

/// HSL representation: `h` in `[0, 360)`, `s` and `l` in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
    pub a: f32,
}

const NAMED: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("cyan", [0, 255, 255]),
    ("aqua", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("fuchsia", [255, 0, 255]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("silver", [192, 192, 192]),
    ("maroon", [128, 0, 0]),
    ("olive", [128, 128, 0]),
    ("lime", [0, 255, 0]),
    ("navy", [0, 0, 128]),
    ("purple", [128, 0, 128]),
    ("teal", [0, 128, 128]),
    ("orange", [255, 165, 0]),
    ("pink", [255, 192, 203]),
    ("brown", [165, 42, 42]),
    ("gold", [255, 215, 0]),
    ("indigo", [75, 0, 130]),
    ("violet", [238, 130, 238]),
    ("coral", [255, 127, 80]),
    ("salmon", [250, 128, 114]),
    ("tomato", [255, 99, 71]),
    ("crimson", [220, 20, 60]),
    ("turquoise", [64, 224, 208]),
];

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse any supported CSS color notation.
    pub fn parse(input: &str) -> Result<Self, ToolError> {
        let s = input.trim().to_ascii_lowercase();
        let invalid = || ToolError::InvalidColor(input.trim().to_string());

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(invalid);
        }
        if s == "transparent" {
            return Ok(Self {
                r: 0,
                g: 0,
                b: 0,
                a: 0.0,
            });
        }
        if let Some((_, [r, g, b])) = NAMED.iter().find(|(name, _)| *name == s) {
            return Ok(Self::rgb(*r, *g, *b));
        }
        if let Some(args) = function_args(&s, &["rgba", "rgb"]) {
            return parse_rgb_args(&args).ok_or_else(invalid);
        }
        if let Some(args) = function_args(&s, &["hsla", "hsl"]) {
            return parse_hsl_args(&args).ok_or_else(invalid);
        }
        Err(invalid())
    }

    /// `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.is_opaque() {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r,
                self.g,
                self.b,
                unit_to_byte(f64::from(self.a))
            )
        }
    }

    pub fn to_rgb_string(&self) -> String {
        if self.is_opaque() {
            format!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({}, {}, {}, {})",
                self.r,
                self.g,
                self.b,
                format_alpha(self.a)
            )
        }
    }

    pub fn to_hsl_string(&self) -> String {
        let hsl = self.to_hsl();
        let (h, s, l) = (hsl.h.round(), hsl.s.round(), hsl.l.round());
        if self.is_opaque() {
            format!("hsl({h}, {s}%, {l}%)")
        } else {
            format!("hsla({h}, {s}%, {l}%, {})", format_alpha(self.a))
        }
    }

    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }

    pub fn to_hsl(&self) -> Hsl {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if (max - min).abs() < f64::EPSILON {
            return Hsl {
                h: 0.0,
                s: 0.0,
                l: l * 100.0,
                a: self.a,
            };
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Hsl {
            h: wrap_hue(h * 60.0),
            s: s * 100.0,
            l: l * 100.0,
            a: self.a,
        }
    }

    pub fn from_hsl(hsl: Hsl) -> Self {
        let h = wrap_hue(hsl.h) / 360.0;
        let s = (hsl.s / 100.0).clamp(0.0, 1.0);
        let l = (hsl.l / 100.0).clamp(0.0, 1.0);

        if s == 0.0 {
            let v = unit_to_byte(l);
            return Self {
                r: v,
                g: v,
                b: v,
                a: hsl.a,
            };
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Self {
            r: unit_to_byte(hue_to_channel(p, q, h + 1.0 / 3.0)),
            g: unit_to_byte(hue_to_channel(p, q, h)),
            b: unit_to_byte(hue_to_channel(p, q, h - 1.0 / 3.0)),
            a: hsl.a,
        }
    }

    /// Rotate the hue by `degrees` (negative rotates backwards).
    pub fn rotate(&self, degrees: f64) -> Self {
        let mut hsl = self.to_hsl();
        hsl.h = wrap_hue(hsl.h + degrees);
        Self::from_hsl(hsl)
    }

    /// Same hue and saturation at lightness `l` (clamped to `[0, 100]`).
    pub fn with_lightness(&self, l: f64) -> Self {
        let mut hsl = self.to_hsl();
        hsl.l = l.clamp(0.0, 100.0);
        Self::from_hsl(hsl)
    }

    pub fn to_rgba8(&self) -> [u8; 4] {
        [self.r, self.g, self.b, unit_to_byte(f64::from(self.a))]
    }
}

fn wrap_hue(h: f64) -> f64 {
    let h = h % 360.0;
    if h < 0.0 { h + 360.0 } else { h }
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn unit_to_byte(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn format_alpha(a: f32) -> String {
    let rounded = (a * 1000.0).round() / 1000.0;
    format!("{rounded}")
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok();
    let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 | 4 => {
            let expand = |v: u8| v * 17;
            let a = if hex.len() == 4 {
                f32::from(expand(digit(3)?)) / 255.0
            } else {
                1.0
            };
            Some(Color {
                r: expand(digit(0)?),
                g: expand(digit(1)?),
                b: expand(digit(2)?),
                a,
            })
        }
        6 | 8 => {
            let a = if hex.len() == 8 {
                f32::from(pair(6)?) / 255.0
            } else {
                1.0
            };
            Some(Color {
                r: pair(0)?,
                g: pair(2)?,
                b: pair(4)?,
                a,
            })
        }
        _ => None,
    }
}

/// Split `name(a, b, c)` / `name(a b c / d)` into its argument tokens.
fn function_args(s: &str, names: &[&str]) -> Option<Vec<String>> {
    let name = names.iter().find(|n| s.starts_with(**n))?;
    let inner = s[name.len()..]
        .trim()
        .strip_prefix('(')?
        .strip_suffix(')')?;
    let args: Vec<String> = inner
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    Some(args)
}

fn parse_alpha(token: Option<&String>) -> Option<f32> {
    match token {
        None => Some(1.0),
        Some(t) => {
            let v = match t.strip_suffix('%') {
                Some(pct) => pct.parse::<f32>().ok()? / 100.0,
                None => t.parse::<f32>().ok()?,
            };
            (0.0..=1.0).contains(&v).then_some(v)
        }
    }
}

fn parse_rgb_args(args: &[String]) -> Option<Color> {
    if !(3..=4).contains(&args.len()) {
        return None;
    }
    let channel = |t: &str| -> Option<u8> {
        let v = match t.strip_suffix('%') {
            Some(pct) => pct.parse::<f64>().ok()? / 100.0,
            None => t.parse::<f64>().ok()? / 255.0,
        };
        (0.0..=1.0).contains(&v).then(|| unit_to_byte(v))
    };
    Some(Color {
        r: channel(&args[0])?,
        g: channel(&args[1])?,
        b: channel(&args[2])?,
        a: parse_alpha(args.get(3))?,
    })
}

fn parse_hsl_args(args: &[String]) -> Option<Color> {
    if !(3..=4).contains(&args.len()) {
        return None;
    }
    let h = args[0].trim_end_matches("deg").parse::<f64>().ok()?;
    let pct = |t: &str| -> Option<f64> {
        let v = t.trim_end_matches('%').parse::<f64>().ok()?;
        (0.0..=100.0).contains(&v).then_some(v)
    };
    Some(Color::from_hsl(Hsl {
        h,
        s: pct(&args[1])?,
        l: pct(&args[2])?,
        a: parse_alpha(args.get(3))?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Color::parse("#ff0000").unwrap(), Color::rgb(255, 0, 0));
        assert_eq!(Color::parse("#F00").unwrap(), Color::rgb(255, 0, 0));
        assert_eq!(Color::parse("  #3b82f6 ").unwrap(), Color::rgb(59, 130, 246));

        let c = Color::parse("#00000080").unwrap();
        assert_eq!((c.r, c.g, c.b), (0, 0, 0));
        assert!((c.a - 128.0 / 255.0).abs() < 1e-6);

        assert!(Color::parse("#12345").is_err());
        assert!(Color::parse("#gggggg").is_err());
    }

    #[test]
    fn test_parse_functions() {
        assert_eq!(Color::parse("rgb(255, 0, 0)").unwrap(), Color::rgb(255, 0, 0));
        assert_eq!(Color::parse("rgb(255 0 0)").unwrap(), Color::rgb(255, 0, 0));

        let c = Color::parse("rgba(0,0,0,0.5)").unwrap();
        assert_eq!((c.r, c.g, c.b, c.a), (0, 0, 0, 0.5));

        let c = Color::parse("rgb(0 0 0 / 50%)").unwrap();
        assert_eq!(c.a, 0.5);

        assert_eq!(Color::parse("hsl(0, 100%, 50%)").unwrap(), Color::rgb(255, 0, 0));
        assert_eq!(Color::parse("hsl(120deg 100% 50%)").unwrap(), Color::rgb(0, 255, 0));

        assert!(Color::parse("rgb(300, 0, 0)").is_err());
        assert!(Color::parse("rgba(0,0,0,2)").is_err());
        assert!(Color::parse("rgb(1, 2)").is_err());
    }

    #[test]
    fn test_parse_named() {
        assert_eq!(Color::parse("White").unwrap(), Color::WHITE);
        assert_eq!(Color::parse("transparent").unwrap().a, 0.0);
        assert!(matches!(
            Color::parse("notacolor"),
            Err(ToolError::InvalidColor(s)) if s == "notacolor"
        ));
    }

    #[test]
    fn test_formatting() {
        let c = Color::rgb(59, 130, 246);
        assert_eq!(c.to_hex(), "#3b82f6");
        assert_eq!(c.to_rgb_string(), "rgb(59, 130, 246)");
        assert_eq!(c.to_hsl_string(), "hsl(217, 91%, 60%)");

        let c = Color::parse("rgba(0,0,0,0.5)").unwrap();
        assert_eq!(c.to_hex(), "#00000080");
        assert_eq!(c.to_rgb_string(), "rgba(0, 0, 0, 0.5)");
    }

    #[test]
    fn test_hsl_round_trip() {
        for hex in ["#3b82f6", "#ff0000", "#10b981", "#808080", "#000000", "#ffffff"] {
            let c = Color::parse(hex).unwrap();
            assert_eq!(Color::from_hsl(c.to_hsl()).to_hex(), hex, "round trip for {hex}");
        }
    }

    #[test]
    fn test_rotate() {
        let red = Color::rgb(255, 0, 0);
        assert_eq!(red.rotate(180.0).to_hex(), "#00ffff");
        assert_eq!(red.rotate(120.0).to_hex(), "#00ff00");
        assert_eq!(red.rotate(240.0).to_hex(), "#0000ff");
        assert_eq!(red.rotate(-120.0).to_hex(), "#0000ff");
        assert_eq!(red.rotate(360.0).to_hex(), "#ff0000");
    }

    #[test]
    fn test_with_lightness() {
        let red = Color::rgb(255, 0, 0);
        assert_eq!(red.with_lightness(0.0).to_hex(), "#000000");
        assert_eq!(red.with_lightness(100.0).to_hex(), "#ffffff");
        assert_eq!(red.with_lightness(150.0).to_hex(), "#ffffff");
        assert_eq!(red.with_lightness(25.0).to_hex(), "#800000");
    }
}
