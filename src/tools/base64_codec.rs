//! Base64 encode/decode.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig, general_purpose};
use serde::{Deserialize, Serialize};

use super::{Tool, ToolError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Encode,
    Decode,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Base64Input {
    pub text: String,
    pub mode: Mode,
    /// Use the URL-safe alphabet (`-` and `_`).
    pub url_safe: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Base64Output {
    pub output: String,
}

pub struct Base64Tool;

impl Tool for Base64Tool {
    const SLUG: &'static str = "base64";
    const STORAGE_KEY: &'static str = "base64Converter";
    const TITLE: &'static str = "Base64 Encoder / Decoder";
    const DESCRIPTION: &'static str = "Encode text or files to Base64 and decode Base64 back to text.";

    type Input = Base64Input;
    type Output = Base64Output;

    fn run(input: &Base64Input) -> Result<Base64Output, ToolError> {
        let output = match input.mode {
            Mode::Encode => encode_bytes(input.text.as_bytes(), input.url_safe),
            Mode::Decode => {
                let bytes = decode_bytes(&input.text, input.url_safe)?;
                String::from_utf8(bytes).map_err(|_| {
                    ToolError::invalid("Decoded data is not valid UTF-8 text")
                })?
            }
        };
        Ok(Base64Output { output })
    }
}

/// Padding is emitted on encode; accepted but not required on decode.
const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

pub fn encode_bytes(bytes: &[u8], url_safe: bool) -> String {
    if url_safe {
        general_purpose::URL_SAFE.encode(bytes)
    } else {
        general_purpose::STANDARD.encode(bytes)
    }
}

/// Decode Base64 text, ignoring whitespace and a leading `data:...;base64,`.
pub fn decode_bytes(text: &str, url_safe: bool) -> Result<Vec<u8>, ToolError> {
    let text = strip_data_url(text.trim());
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    let engine = if url_safe {
        &URL_SAFE_LENIENT
    } else {
        &STANDARD_LENIENT
    };
    engine
        .decode(compact)
        .map_err(|_| ToolError::invalid("Invalid Base64 string"))
}

fn strip_data_url(text: &str) -> &str {
    if text.starts_with("data:")
        && let Some(pos) = text.find(";base64,")
    {
        return &text[pos + ";base64,".len()..];
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, mode: Mode, url_safe: bool) -> Result<String, ToolError> {
        Base64Tool::run(&Base64Input {
            text: text.to_string(),
            mode,
            url_safe,
        })
        .map(|out| out.output)
    }

    #[test]
    fn test_encode() {
        assert_eq!(run("Hello", Mode::Encode, false).unwrap(), "SGVsbG8=");
        assert_eq!(run("", Mode::Encode, false).unwrap(), "");
        assert_eq!(run("héllo", Mode::Encode, false).unwrap(), "aMOpbGxv");
    }

    #[test]
    fn test_decode() {
        assert_eq!(run("SGVsbG8=", Mode::Decode, false).unwrap(), "Hello");
        assert_eq!(run("SGVsbG8", Mode::Decode, false).unwrap(), "Hello");
        assert_eq!(run("  SGVs\nbG8=  ", Mode::Decode, false).unwrap(), "Hello");
        assert_eq!(run("", Mode::Decode, false).unwrap(), "");
    }

    #[test]
    fn test_decode_data_url() {
        assert_eq!(
            run("data:text/plain;base64,SGVsbG8=", Mode::Decode, false).unwrap(),
            "Hello"
        );
    }

    #[test]
    fn test_url_safe() {
        let bytes = [0xfb, 0xff, 0xfe];
        assert_eq!(encode_bytes(&bytes, false), "+//+");
        assert_eq!(encode_bytes(&bytes, true), "-__-");
        assert_eq!(decode_bytes("-__-", true).unwrap(), bytes);
        assert!(decode_bytes("-__-", false).is_err());
    }

    #[test]
    fn test_decode_invalid() {
        let err = run("not base64!", Mode::Decode, false).unwrap_err();
        assert_eq!(err.to_string(), "Invalid Base64 string");
    }

    #[test]
    fn test_decode_non_utf8() {
        // 0xff 0xfe is not valid UTF-8 but is valid Base64 content
        assert!(run("//4=", Mode::Decode, false).is_err());
        assert_eq!(decode_bytes("//4=", false).unwrap(), [0xff, 0xfe]);
    }
}
