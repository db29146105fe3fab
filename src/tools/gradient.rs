//! CSS gradient generator.

use serde::{Deserialize, Serialize};

use super::{Color, Tool, ToolError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    #[default]
    Linear,
    Radial,
    Conic,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RadialShape {
    #[default]
    Circle,
    Ellipse,
}

impl RadialShape {
    fn as_str(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Ellipse => "ellipse",
        }
    }
}

/// A color at a percentage position along the gradient line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorStop {
    pub color: String,
    /// Percent; anything outside `0..=100` is rejected by the tool.
    pub position: i32,
}

impl ColorStop {
    pub fn new(color: impl Into<String>, position: i32) -> Self {
        Self {
            color: color.into(),
            position,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientInput {
    pub kind: GradientKind,
    /// Degrees in `0..=360`, used by linear and conic gradients.
    pub angle: i32,
    /// Used by radial gradients.
    pub shape: RadialShape,
    pub stops: Vec<ColorStop>,
}

impl Default for GradientInput {
    fn default() -> Self {
        Self {
            kind: GradientKind::Linear,
            angle: 90,
            shape: RadialShape::Circle,
            stops: vec![ColorStop::new("#ff0000", 0), ColorStop::new("#0000ff", 100)],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GradientOutput {
    pub value: String,
    pub css: String,
}

pub struct GradientTool;

impl Tool for GradientTool {
    const SLUG: &'static str = "gradient";
    const STORAGE_KEY: &'static str = "gradientGenerator";
    const TITLE: &'static str = "CSS Gradient Generator";
    const DESCRIPTION: &'static str = "Build linear, radial and conic gradients from color stops.";

    type Input = GradientInput;
    type Output = GradientOutput;

    fn run(input: &GradientInput) -> Result<GradientOutput, ToolError> {
        if input.stops.len() < 2 {
            return Err(ToolError::invalid("A gradient needs at least two color stops"));
        }
        if !(0..=360).contains(&input.angle) {
            return Err(ToolError::invalid(format!(
                "Angle must be between 0 and 360 degrees, got {}",
                input.angle
            )));
        }

        let mut stops = input.stops.clone();
        for stop in &mut stops {
            if !(0..=100).contains(&stop.position) {
                return Err(ToolError::invalid(format!(
                    "Stop position must be between 0 and 100, got {}",
                    stop.position
                )));
            }
            stop.color = stop.color.trim().to_string();
            Color::parse(&stop.color)?;
        }
        // Stable: stops sharing a position keep their input order
        stops.sort_by_key(|stop| stop.position);

        let stops = stops
            .iter()
            .map(|stop| format!("{} {}%", stop.color, stop.position))
            .collect::<Vec<_>>()
            .join(", ");

        let value = match input.kind {
            GradientKind::Linear => format!("linear-gradient({}deg, {stops})", input.angle),
            GradientKind::Radial => format!("radial-gradient({}, {stops})", input.shape.as_str()),
            GradientKind::Conic => format!("conic-gradient(from {}deg, {stops})", input.angle),
        };
        let css = format!("background: {value};");

        Ok(GradientOutput { value, css })
    }
}
