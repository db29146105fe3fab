//! Developer utilities.
//!
//! Every tool is a leaf: an input record, a call into a library, an output
//! record. Tools never call each other; `color` is the only shared value type.
//!
//! # Modules
//!
//! | Module             | Slug            | Backend               |
//! |--------------------|-----------------|-----------------------|
//! | `base64_codec`     | `base64`        | `base64`              |
//! | `box_shadow`       | `box-shadow`    | string building       |
//! | `gradient`         | `gradient`      | string building       |
//! | `qr_code`          | `qr`            | `qrcode` + `image`    |
//! | `palette`          | `palette`       | HSL hue rotation      |
//! | `meta_tags`        | `meta-tags`     | string building       |
//! | `jwt_decode`       | `jwt`           | `base64` + `jsonwebtoken` |
//! | `markdown_preview` | `markdown`      | `pulldown-cmark`      |
//! | `html_entities`    | `html-entities` | `regex`               |
//! | `svg_png`          | `svg-to-png`    | `usvg` + `resvg`      |
//! | `uuid_gen`         | `uuid`          | `uuid`                |
//! | `yaml_json`        | `yaml-json`     | `serde_yaml`          |

pub mod base64_codec;
pub mod box_shadow;
pub mod color;
mod error;
pub mod gradient;
pub mod html_entities;
pub mod jwt_decode;
pub mod markdown_preview;
pub mod meta_tags;
pub mod palette;
pub mod qr_code;
pub mod svg_png;
pub mod uuid_gen;
pub mod yaml_json;

pub use color::Color;
pub use error::ToolError;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value as JsonValue;

/// A single-purpose utility.
pub trait Tool {
    /// Name used on the command line and in URLs.
    const SLUG: &'static str;
    /// Key under which the last input is persisted.
    const STORAGE_KEY: &'static str;
    const TITLE: &'static str;
    const DESCRIPTION: &'static str;

    type Input: Serialize + DeserializeOwned + Default + Clone;
    type Output: Serialize;

    fn run(input: &Self::Input) -> Result<Self::Output, ToolError>;
}

/// All tools, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Base64,
    BoxShadow,
    Gradient,
    Qr,
    Palette,
    MetaTags,
    Jwt,
    Markdown,
    HtmlEntities,
    SvgToPng,
    Uuid,
    YamlJson,
}

/// Static description of a tool (for listings and pages).
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInfo {
    pub slug: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub storage_key: &'static str,
}

impl ToolInfo {
    fn of<T: Tool>() -> Self {
        Self {
            slug: T::SLUG,
            title: T::TITLE,
            description: T::DESCRIPTION,
            storage_key: T::STORAGE_KEY,
        }
    }
}

/// Expand `$body` once with `$t` bound to the tool type behind `$kind`.
macro_rules! with_tool {
    ($kind:expr, $t:ident => $body:expr) => {
        match $kind {
            ToolKind::Base64 => {
                type $t = base64_codec::Base64Tool;
                $body
            }
            ToolKind::BoxShadow => {
                type $t = box_shadow::BoxShadowTool;
                $body
            }
            ToolKind::Gradient => {
                type $t = gradient::GradientTool;
                $body
            }
            ToolKind::Qr => {
                type $t = qr_code::QrTool;
                $body
            }
            ToolKind::Palette => {
                type $t = palette::PaletteTool;
                $body
            }
            ToolKind::MetaTags => {
                type $t = meta_tags::MetaTagsTool;
                $body
            }
            ToolKind::Jwt => {
                type $t = jwt_decode::JwtTool;
                $body
            }
            ToolKind::Markdown => {
                type $t = markdown_preview::MarkdownTool;
                $body
            }
            ToolKind::HtmlEntities => {
                type $t = html_entities::HtmlEntitiesTool;
                $body
            }
            ToolKind::SvgToPng => {
                type $t = svg_png::SvgPngTool;
                $body
            }
            ToolKind::Uuid => {
                type $t = uuid_gen::UuidTool;
                $body
            }
            ToolKind::YamlJson => {
                type $t = yaml_json::YamlJsonTool;
                $body
            }
        }
    };
}

impl ToolKind {
    pub const ALL: [Self; 12] = [
        Self::Base64,
        Self::BoxShadow,
        Self::Gradient,
        Self::Qr,
        Self::Palette,
        Self::MetaTags,
        Self::Jwt,
        Self::Markdown,
        Self::HtmlEntities,
        Self::SvgToPng,
        Self::Uuid,
        Self::YamlJson,
    ];

    pub fn info(self) -> ToolInfo {
        with_tool!(self, T => ToolInfo::of::<T>())
    }

    pub fn slug(self) -> &'static str {
        self.info().slug
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.slug() == slug)
    }

    /// The tool's default input as JSON.
    pub fn default_input(self) -> JsonValue {
        with_tool!(self, T => default_input::<T>())
    }

    /// Run the tool on a JSON input, missing fields taking their defaults.
    pub fn run_json(self, input: JsonValue) -> Result<JsonValue, ToolError> {
        with_tool!(self, T => run_json::<T>(input))
    }
}

fn default_input<T: Tool>() -> JsonValue {
    serde_json::to_value(T::Input::default()).unwrap_or(JsonValue::Null)
}

fn run_json<T: Tool>(input: JsonValue) -> Result<JsonValue, ToolError> {
    let input = match input {
        JsonValue::Null => T::Input::default(),
        value => serde_json::from_value::<T::Input>(value)?,
    };
    let output = T::run(&input)?;
    Ok(serde_json::to_value(output)?)
}

/// Build a `data:` URL for binary tool output.
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    use base64::Engine;
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime};base64,{encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_slugs_unique() {
        let mut slugs: Vec<_> = ToolKind::ALL.iter().map(|k| k.slug()).collect();
        slugs.sort_unstable();
        slugs.dedup();
        assert_eq!(slugs.len(), ToolKind::ALL.len());
    }

    #[test]
    fn test_storage_keys_unique() {
        let mut keys: Vec<_> = ToolKind::ALL.iter().map(|k| k.info().storage_key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), ToolKind::ALL.len());
    }

    #[test]
    fn test_from_slug() {
        assert_eq!(ToolKind::from_slug("box-shadow"), Some(ToolKind::BoxShadow));
        assert_eq!(ToolKind::from_slug("jwt"), Some(ToolKind::Jwt));
        assert_eq!(ToolKind::from_slug("nope"), None);
    }

    #[test]
    fn test_run_json() {
        let out = ToolKind::Base64
            .run_json(json!({ "text": "Hello", "mode": "encode" }))
            .unwrap();
        assert_eq!(out["output"], "SGVsbG8=");
    }

    #[test]
    fn test_run_json_defaults_missing_fields() {
        let out = ToolKind::BoxShadow.run_json(json!({})).unwrap();
        assert_eq!(out["value"], "5px 5px 10px 0px rgba(0,0,0,0.5)");

        let out = ToolKind::BoxShadow.run_json(JsonValue::Null).unwrap();
        assert_eq!(out["value"], "5px 5px 10px 0px rgba(0,0,0,0.5)");
    }

    #[test]
    fn test_run_json_bad_input() {
        let err = ToolKind::Uuid
            .run_json(json!({ "count": "many" }))
            .unwrap_err();
        assert!(matches!(err, ToolError::Parse { format: "JSON", .. }));
    }

    #[test]
    fn test_default_input_round_trips() {
        for kind in ToolKind::ALL {
            let input = kind.default_input();
            assert!(input.is_object(), "{}", kind.slug());
            // defaults feed straight back in; tools needing text may still reject them
            if let Err(err) = kind.run_json(input) {
                assert!(!matches!(err, ToolError::Parse { format: "JSON", .. }));
            }
        }
    }

    #[test]
    fn test_data_url() {
        assert_eq!(data_url("text/plain", b"Hello"), "data:text/plain;base64,SGVsbG8=");
    }
}
