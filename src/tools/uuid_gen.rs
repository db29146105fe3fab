//! UUID generator and validator.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Tool, ToolError};

pub const MAX_COUNT: u32 = 1000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UuidVersion {
    #[default]
    V4,
    /// Time-ordered (Unix epoch milliseconds + random).
    V7,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UuidInput {
    pub count: u32,
    pub version: UuidVersion,
    pub uppercase: bool,
    pub hyphens: bool,
    pub braces: bool,
}

impl Default for UuidInput {
    fn default() -> Self {
        Self {
            count: 1,
            version: UuidVersion::V4,
            uppercase: false,
            hyphens: true,
            braces: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UuidOutput {
    pub uuids: Vec<String>,
}

pub struct UuidTool;

impl Tool for UuidTool {
    const SLUG: &'static str = "uuid";
    const STORAGE_KEY: &'static str = "uuidGenerator";
    const TITLE: &'static str = "UUID Generator";
    const DESCRIPTION: &'static str = "Generate random (v4) or time-ordered (v7) UUIDs in bulk.";

    type Input = UuidInput;
    type Output = UuidOutput;

    fn run(input: &UuidInput) -> Result<UuidOutput, ToolError> {
        if !(1..=MAX_COUNT).contains(&input.count) {
            return Err(ToolError::invalid(format!(
                "Count must be between 1 and {MAX_COUNT}"
            )));
        }
        let uuids = (0..input.count)
            .map(|_| {
                let id = match input.version {
                    UuidVersion::V4 => Uuid::new_v4(),
                    UuidVersion::V7 => Uuid::now_v7(),
                };
                format_uuid(id, input)
            })
            .collect();
        Ok(UuidOutput { uuids })
    }
}

fn format_uuid(id: Uuid, opts: &UuidInput) -> String {
    let mut s = if opts.hyphens {
        id.hyphenated().to_string()
    } else {
        id.simple().to_string()
    };
    if opts.uppercase {
        s.make_ascii_uppercase();
    }
    if opts.braces {
        s = format!("{{{s}}}");
    }
    s
}

/// Version number of a parseable UUID (braces, urn prefix and no-hyphen
/// forms are accepted).
pub fn validate(text: &str) -> Result<usize, ToolError> {
    let text = text.trim();
    // `uuid` only takes braces around the hyphenated form
    let text = text
        .strip_prefix('{')
        .and_then(|t| t.strip_suffix('}'))
        .unwrap_or(text);
    Uuid::try_parse(text)
        .map(|id| id.get_version_num())
        .map_err(|e| ToolError::parse("UUID", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: UuidInput) -> Vec<String> {
        UuidTool::run(&input).unwrap().uuids
    }

    fn is_canonical(s: &str) -> bool {
        let groups: Vec<&str> = s.split('-').collect();
        groups.len() == 5
            && groups.iter().map(|g| g.len()).eq([8, 4, 4, 4, 12])
            && groups
                .iter()
                .all(|g| g.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')))
    }

    #[test]
    fn test_default_v4() {
        let ids = run(UuidInput::default());
        assert_eq!(ids.len(), 1);
        assert_eq!(ids[0].len(), 36);
        assert!(is_canonical(&ids[0]), "{}", ids[0]);
        assert_eq!(ids[0].as_bytes()[14], b'4');
        assert_eq!(validate(&ids[0]).unwrap(), 4);
    }

    #[test]
    fn test_bulk_unique() {
        let mut ids = run(UuidInput {
            count: 500,
            ..UuidInput::default()
        });
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn test_v7_sorted() {
        let ids = run(UuidInput {
            count: 3,
            version: UuidVersion::V7,
            ..UuidInput::default()
        });
        assert!(ids.iter().all(|id| validate(id).unwrap() == 7));
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_formatting() {
        let id = &run(UuidInput {
            uppercase: true,
            hyphens: false,
            braces: true,
            ..UuidInput::default()
        })[0];
        assert_eq!(id.len(), 34);
        assert!(id.starts_with('{') && id.ends_with('}'));
        assert!(!id.contains('-'));
        assert!(!id.chars().any(|c| c.is_ascii_lowercase()));
        assert_eq!(validate(id).unwrap(), 4);
    }

    #[test]
    fn test_count_bounds() {
        for count in [0, MAX_COUNT + 1] {
            let err = UuidTool::run(&UuidInput {
                count,
                ..UuidInput::default()
            })
            .unwrap_err();
            assert_eq!(err.to_string(), "Count must be between 1 and 1000");
        }
        assert_eq!(
            run(UuidInput {
                count: MAX_COUNT,
                ..UuidInput::default()
            })
            .len(),
            1000
        );
    }

    #[test]
    fn test_validate() {
        assert_eq!(validate("urn:uuid:67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap(), 4);
        assert_eq!(validate("{67E5504410B1426F9247BB680E5FE0C8}").unwrap(), 4);
        assert_eq!(validate("{67e55044-10b1-426f-9247-bb680e5fe0c8}").unwrap(), 4);
        assert!(validate("{{67e5504410b1426f9247bb680e5fe0c8}}").is_err());
        assert!(validate("{67e5504410b1426f9247bb680e5fe0c8").is_err());
        assert!(matches!(
            validate("not-a-uuid"),
            Err(ToolError::Parse { format: "UUID", .. })
        ));
    }
}
