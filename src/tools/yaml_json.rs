//! YAML ⇄ JSON converter.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use serde_json::ser::{PrettyFormatter, Serializer};

use super::{Tool, ToolError};

const MAX_INDENT: usize = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    #[default]
    YamlToJson,
    JsonToYaml,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YamlJsonInput {
    pub text: String,
    pub direction: Direction,
    /// JSON indent width; 0 gives compact output.
    pub indent: usize,
}

impl Default for YamlJsonInput {
    fn default() -> Self {
        Self {
            text: String::new(),
            direction: Direction::YamlToJson,
            indent: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct YamlJsonOutput {
    pub output: String,
}

pub struct YamlJsonTool;

impl Tool for YamlJsonTool {
    const SLUG: &'static str = "yaml-json";
    const STORAGE_KEY: &'static str = "yamlJsonConverter";
    const TITLE: &'static str = "YAML ⇄ JSON Converter";
    const DESCRIPTION: &'static str = "Convert YAML documents to JSON and back.";

    type Input = YamlJsonInput;
    type Output = YamlJsonOutput;

    fn run(input: &YamlJsonInput) -> Result<YamlJsonOutput, ToolError> {
        if input.text.trim().is_empty() {
            return Err(ToolError::invalid("Please enter some text to convert"));
        }
        if input.indent > MAX_INDENT {
            return Err(ToolError::invalid(format!(
                "Indent must be at most {MAX_INDENT}"
            )));
        }

        let output = match input.direction {
            Direction::YamlToJson => {
                let value: JsonValue = serde_yaml::from_str(&input.text)
                    .map_err(|e| ToolError::parse("YAML", e))?;
                to_json(&value, input.indent)?
            }
            Direction::JsonToYaml => {
                let value: JsonValue = serde_json::from_str(&input.text)?;
                serde_yaml::to_string(&value).map_err(|e| ToolError::Encode(e.to_string()))?
            }
        };
        Ok(YamlJsonOutput { output })
    }
}

fn to_json(value: &JsonValue, indent: usize) -> Result<String, ToolError> {
    if indent == 0 {
        return Ok(serde_json::to_string(value)?);
    }
    let indent = " ".repeat(indent);
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
    value.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| ToolError::Encode(e.to_string()))
}
