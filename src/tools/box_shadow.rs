//! CSS `box-shadow` generator.

use serde::{Deserialize, Serialize};

use super::{Color, Tool, ToolError};

/// One layer of a box shadow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Shadow {
    pub h_offset: i32,
    pub v_offset: i32,
    pub blur: u32,
    pub spread: i32,
    pub color: String,
    pub inset: bool,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            h_offset: 5,
            v_offset: 5,
            blur: 10,
            spread: 0,
            color: "rgba(0,0,0,0.5)".to_string(),
            inset: false,
        }
    }
}

impl Shadow {
    /// Render as a single `box-shadow` layer, validating the color.
    pub fn to_css(&self) -> Result<String, ToolError> {
        let color = self.color.trim();
        Color::parse(color)?;

        let inset = if self.inset { "inset " } else { "" };
        Ok(format!(
            "{inset}{}px {}px {}px {}px {color}",
            self.h_offset, self.v_offset, self.blur, self.spread
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxShadowInput {
    pub shadows: Vec<Shadow>,
}

impl Default for BoxShadowInput {
    fn default() -> Self {
        Self {
            shadows: vec![Shadow::default()],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BoxShadowOutput {
    /// Property value, e.g. `5px 5px 10px 0px rgba(0,0,0,0.5)`.
    pub value: String,
    /// Ready-to-paste declarations.
    pub css: String,
}

pub struct BoxShadowTool;

impl Tool for BoxShadowTool {
    const SLUG: &'static str = "box-shadow";
    const STORAGE_KEY: &'static str = "boxShadowGenerator";
    const TITLE: &'static str = "Box Shadow Generator";
    const DESCRIPTION: &'static str = "Layer one or more shadows and copy the resulting CSS.";

    type Input = BoxShadowInput;
    type Output = BoxShadowOutput;

    fn run(input: &BoxShadowInput) -> Result<BoxShadowOutput, ToolError> {
        let value = if input.shadows.is_empty() {
            "none".to_string()
        } else {
            input
                .shadows
                .iter()
                .map(Shadow::to_css)
                .collect::<Result<Vec<_>, _>>()?
                .join(", ")
        };

        let css = format!("-webkit-box-shadow: {value};\nbox-shadow: {value};");
        Ok(BoxShadowOutput { value, css })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_shadow() {
        let shadow = Shadow {
            h_offset: 5,
            v_offset: 5,
            blur: 10,
            spread: 0,
            color: "rgba(0,0,0,0.5)".to_string(),
            inset: false,
        };
        assert_eq!(shadow.to_css().unwrap(), "5px 5px 10px 0px rgba(0,0,0,0.5)");
    }

    #[test]
    fn test_inset_and_negative() {
        let shadow = Shadow {
            h_offset: -3,
            v_offset: 0,
            blur: 0,
            spread: -2,
            color: " #ff0000 ".to_string(),
            inset: true,
        };
        assert_eq!(shadow.to_css().unwrap(), "inset -3px 0px 0px -2px #ff0000");
    }

    #[test]
    fn test_multiple_shadows() {
        let input = BoxShadowInput {
            shadows: vec![
                Shadow::default(),
                Shadow {
                    inset: true,
                    color: "#fff".into(),
                    ..Shadow::default()
                },
            ],
        };
        let out = BoxShadowTool::run(&input).unwrap();
        assert_eq!(
            out.value,
            "5px 5px 10px 0px rgba(0,0,0,0.5), inset 5px 5px 10px 0px #fff"
        );
        assert!(out.css.ends_with(&format!("box-shadow: {};", out.value)));
        assert!(out.css.starts_with("-webkit-box-shadow:"));
    }

    #[test]
    fn test_no_shadows() {
        let out = BoxShadowTool::run(&BoxShadowInput { shadows: vec![] }).unwrap();
        assert_eq!(out.value, "none");
    }

    #[test]
    fn test_invalid_color() {
        let input = BoxShadowInput {
            shadows: vec![Shadow {
                color: "blurple".into(),
                ..Shadow::default()
            }],
        };
        assert!(matches!(
            BoxShadowTool::run(&input),
            Err(ToolError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_deserialize_camel_case() {
        let input: BoxShadowInput = serde_json::from_str(
            r#"{"shadows":[{"hOffset":1,"vOffset":2,"blur":3,"spread":4,"color":"red","inset":false}]}"#,
        )
        .unwrap();
        assert_eq!(BoxShadowTool::run(&input).unwrap().value, "1px 2px 3px 4px red");
    }
}
